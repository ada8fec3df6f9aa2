//! ECS World implementation
//!
//! The [`World`] composes the entity, component and system managers and keeps
//! them consistent: every structural change updates the entity's signature
//! and every system's membership in the same call.

use super::storage::ComponentStore;
use super::{
    Component, ComponentManager, ComponentType, EcsError, EcsResult, Entity, EntityManager,
    Signature, SystemId, SystemManager, DEFAULT_MAX_ENTITIES,
};
use log::{error, trace};

/// ECS World containing all entities, components and system memberships
#[derive(Debug)]
pub struct World {
    entities: EntityManager,
    components: ComponentManager,
    systems: SystemManager,
}

impl World {
    /// Create a world holding at most `max_entities` living entities
    pub fn new(max_entities: usize) -> Self {
        Self {
            entities: EntityManager::new(max_entities),
            components: ComponentManager::new(),
            systems: SystemManager::new(),
        }
    }

    /// Create a new entity with an empty signature
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        self.entities.create_entity().map_err(|err| {
            error!("entity allocation failed: {err}");
            err
        })
    }

    /// Destroy an entity and drop all its components
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.entities.destroy_entity(entity)?;
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        Ok(())
    }

    /// Create a new entity carrying deep copies of every component of `source`
    pub fn clone_entity(&mut self, source: Entity) -> EcsResult<Entity> {
        let signature = self.entities.signature(source)?;
        let clone = self.create_entity()?;
        self.components.copy_components(source, clone, signature);
        self.entities.set_signature(clone, signature)?;
        self.systems.entity_signature_changed(clone, signature);
        trace!("cloned {source} into {clone}");
        Ok(clone)
    }

    /// Register a component type
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentType> {
        self.components.register::<T>()
    }

    /// Signature bit of a registered component type
    pub fn component_type<T: Component>(&self) -> EcsResult<ComponentType> {
        self.components.component_type::<T>()
    }

    /// Add or overwrite a component on a living entity
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        let mut signature = self.entities.signature(entity)?;
        let component_type = self.components.add(entity, component)?;
        signature.set(component_type);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Remove a component, returning its value
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        let mut signature = self.entities.signature(entity)?;
        let (component_type, value) = self.components.remove::<T>(entity)?;
        signature.clear(component_type);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(value)
    }

    /// Borrow a component
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.check_alive(entity)?;
        self.components.get::<T>(entity)
    }

    /// Mutably borrow a component
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.check_alive(entity)?;
        self.components.get_mut::<T>(entity)
    }

    /// Borrow a component if the entity has one
    pub fn try_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.get_component(entity).ok()
    }

    /// Mutably borrow a component if the entity has one
    pub fn try_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.get_component_mut(entity).ok()
    }

    /// Check whether the entity has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        match (self.entities.signature(entity), self.components.component_type::<T>()) {
            (Ok(signature), Ok(component_type)) => signature.contains(component_type),
            _ => false,
        }
    }

    /// Borrow the typed store of `T` for bulk iteration
    pub fn query<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        self.components.store::<T>()
    }

    /// Signature of a living entity
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.entities.signature(entity)
    }

    /// Check whether the entity is alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of living entities
    pub const fn entity_count(&self) -> usize {
        self.entities.living_count()
    }

    /// Iterate over living entities in id order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Register a system; existing entities that match are added immediately
    pub fn register_system(&mut self, name: impl Into<String>, signature: Signature) -> SystemId {
        let existing = self.living_signatures();
        self.systems.register_system(name, signature, existing)
    }

    /// Change a system's required signature
    pub fn set_system_signature(&mut self, id: SystemId, signature: Signature) -> bool {
        let existing = self.living_signatures();
        self.systems.set_signature(id, signature, existing)
    }

    /// Snapshot of a system's members, sorted by id
    ///
    /// Returns an owned list so the caller can mutate the world while
    /// iterating. Unknown systems yield an empty list.
    pub fn system_entities(&self, id: SystemId) -> Vec<Entity> {
        let mut members: Vec<Entity> = self
            .systems
            .entities(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        members.sort_unstable();
        members
    }

    /// Read-only access to the system manager
    pub const fn systems(&self) -> &SystemManager {
        &self.systems
    }

    /// Read-only access to the component manager
    pub const fn components(&self) -> &ComponentManager {
        &self.components
    }

    fn living_signatures(&self) -> Vec<(Entity, Signature)> {
        self.entities
            .iter()
            .filter_map(|entity| self.entities.signature(entity).ok().map(|sig| (entity, sig)))
            .collect()
    }

    fn check_alive(&self, entity: Entity) -> EcsResult<()> {
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITIES)
    }
}
