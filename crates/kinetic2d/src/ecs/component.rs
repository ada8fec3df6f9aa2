//! Component trait and the component manager

use super::storage::{ComponentStore, ErasedStore};
use super::{ComponentType, EcsError, EcsResult, Entity, Signature, MAX_COMPONENTS};
use log::debug;
use std::any::{type_name, TypeId};
use std::collections::HashMap;

/// Marker trait for components
///
/// Components are plain data. `Clone` is required so entities can be cloned
/// component by component.
pub trait Component: 'static + Clone + Send + Sync {}

struct RegisteredStore {
    component_type: ComponentType,
    name: &'static str,
    store: Box<dyn ErasedStore>,
}

/// Owns one [`ComponentStore`] per registered component type
#[derive(Default)]
pub struct ComponentManager {
    stores: HashMap<TypeId, RegisteredStore>,
    /// Registration order; index is the signature bit
    by_bit: Vec<TypeId>,
}

impl ComponentManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`, assigning it the next free signature bit
    ///
    /// Registering an already known type returns its existing bit.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentType> {
        let type_id = TypeId::of::<T>();
        if let Some(registered) = self.stores.get(&type_id) {
            return Ok(registered.component_type);
        }
        if self.by_bit.len() >= MAX_COMPONENTS {
            return Err(EcsError::CapacityExceeded {
                what: "component types",
                limit: MAX_COMPONENTS,
            });
        }

        let component_type = ComponentType::from_index(self.by_bit.len());
        self.by_bit.push(type_id);
        self.stores.insert(
            type_id,
            RegisteredStore {
                component_type,
                name: type_name::<T>(),
                store: Box::new(ComponentStore::<T>::new()),
            },
        );
        debug!("registered component {} as bit {}", type_name::<T>(), component_type.index());
        Ok(component_type)
    }

    /// Signature bit assigned to `T`
    pub fn component_type<T: Component>(&self) -> EcsResult<ComponentType> {
        self.stores
            .get(&TypeId::of::<T>())
            .map(|registered| registered.component_type)
            .ok_or(EcsError::ComponentNotRegistered(type_name::<T>()))
    }

    /// Number of registered component types
    pub fn registered_count(&self) -> usize {
        self.by_bit.len()
    }

    /// Name of the type registered at `component_type`
    pub fn name_of(&self, component_type: ComponentType) -> Option<&'static str> {
        let type_id = self.by_bit.get(component_type.index())?;
        self.stores.get(type_id).map(|registered| registered.name)
    }

    /// Borrow the typed store for `T`
    pub fn store<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|registered| registered.store.as_any().downcast_ref::<ComponentStore<T>>())
            .ok_or(EcsError::ComponentNotRegistered(type_name::<T>()))
    }

    /// Mutably borrow the typed store for `T`
    pub fn store_mut<T: Component>(&mut self) -> EcsResult<&mut ComponentStore<T>> {
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|registered| registered.store.as_any_mut().downcast_mut::<ComponentStore<T>>())
            .ok_or(EcsError::ComponentNotRegistered(type_name::<T>()))
    }

    /// Insert or overwrite `T` for `entity`, returning the bit to set
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<ComponentType> {
        let component_type = self.component_type::<T>()?;
        self.store_mut::<T>()?.insert(entity, value);
        Ok(component_type)
    }

    /// Remove `T` from `entity`
    pub fn remove<T: Component>(&mut self, entity: Entity) -> EcsResult<(ComponentType, T)> {
        let component_type = self.component_type::<T>()?;
        let value = self
            .store_mut::<T>()?
            .remove(entity)
            .ok_or_else(|| missing::<T>(entity))?;
        Ok((component_type, value))
    }

    /// Borrow `T` for `entity`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.store::<T>()?.get(entity).ok_or_else(|| missing::<T>(entity))
    }

    /// Mutably borrow `T` for `entity`
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.store_mut::<T>()?
            .get_mut(entity)
            .ok_or_else(|| missing::<T>(entity))
    }

    /// Check whether the store at `component_type` holds a value for `entity`
    pub fn contains(&self, entity: Entity, component_type: ComponentType) -> bool {
        self.by_bit
            .get(component_type.index())
            .and_then(|type_id| self.stores.get(type_id))
            .is_some_and(|registered| registered.store.contains(entity))
    }

    /// Drop every component owned by `entity`
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for registered in self.stores.values_mut() {
            registered.store.remove_entity(entity);
        }
    }

    /// Deep-copy every component named in `signature` from `source` to `target`
    pub fn copy_components(&mut self, source: Entity, target: Entity, signature: Signature) {
        for component_type in signature.iter() {
            let Some(type_id) = self.by_bit.get(component_type.index()) else {
                continue;
            };
            if let Some(registered) = self.stores.get_mut(type_id) {
                registered.store.copy_entity(source, target);
            }
        }
    }
}

impl std::fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self
            .by_bit
            .iter()
            .filter_map(|type_id| self.stores.get(type_id).map(|registered| registered.name))
            .collect();
        f.debug_struct("ComponentManager").field("registered", &names).finish()
    }
}

fn missing<T>(entity: Entity) -> EcsError {
    EcsError::ComponentMissing {
        entity,
        component: type_name::<T>(),
    }
}
