//! Entity handles and the entity manager

use super::{EcsError, EcsResult, Signature};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Entity identifier
///
/// A plain lookup key. Ids of destroyed entities are recycled, so holding an
/// `Entity` across a destroy does not keep the slot alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create an entity handle from a raw id
    pub const fn from_raw(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub const fn id(self) -> u32 {
        self.id
    }

    pub(crate) const fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id)
    }
}

/// Allocates entity ids and tracks each living entity's signature
#[derive(Debug)]
pub struct EntityManager {
    /// Destroyed ids waiting for reuse, oldest first
    available: VecDeque<Entity>,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    living_count: usize,
    max_entities: usize,
}

impl EntityManager {
    /// Create a manager that holds at most `max_entities` living entities
    pub fn new(max_entities: usize) -> Self {
        Self {
            available: VecDeque::new(),
            signatures: Vec::new(),
            alive: Vec::new(),
            living_count: 0,
            max_entities,
        }
    }

    /// Allocate an entity, reusing the oldest freed id when one exists
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        if self.living_count >= self.max_entities {
            return Err(EcsError::CapacityExceeded {
                what: "entities",
                limit: self.max_entities,
            });
        }

        let entity = if let Some(recycled) = self.available.pop_front() {
            self.alive[recycled.index()] = true;
            recycled
        } else {
            let id = u32::try_from(self.alive.len()).map_err(|_| EcsError::CapacityExceeded {
                what: "entity ids",
                limit: u32::MAX as usize,
            })?;
            self.alive.push(true);
            self.signatures.push(Signature::EMPTY);
            Entity::from_raw(id)
        };

        self.living_count += 1;
        trace!("created {entity}");
        Ok(entity)
    }

    /// Release an entity and clear its signature
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.check_alive(entity)?;
        let index = entity.index();
        self.alive[index] = false;
        self.signatures[index] = Signature::EMPTY;
        self.available.push_back(entity);
        self.living_count -= 1;
        trace!("destroyed {entity}");
        Ok(())
    }

    /// Get the signature of a living entity
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.check_alive(entity)?;
        Ok(self.signatures[entity.index()])
    }

    /// Replace the signature of a living entity
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        self.check_alive(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    /// Check whether the entity is currently alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Number of living entities
    pub const fn living_count(&self) -> usize {
        self.living_count
    }

    /// Configured entity limit
    pub const fn max_entities(&self) -> usize {
        self.max_entities
    }

    /// Iterate over living entities in id order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(index, _)| Entity::from_raw(index as u32))
    }

    fn check_alive(&self, entity: Entity) -> EcsResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new(super::DEFAULT_MAX_ENTITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentType;

    #[test]
    fn test_sequential_allocation() {
        let mut manager = EntityManager::new(8);
        let a = manager.create_entity().unwrap();
        let b = manager.create_entity().unwrap();
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert_eq!(manager.living_count(), 2);
    }

    #[test]
    fn test_free_list_is_fifo() {
        let mut manager = EntityManager::new(8);
        let entities: Vec<_> = (0..4).map(|_| manager.create_entity().unwrap()).collect();

        manager.destroy_entity(entities[2]).unwrap();
        manager.destroy_entity(entities[0]).unwrap();

        assert_eq!(manager.create_entity().unwrap(), entities[2]);
        assert_eq!(manager.create_entity().unwrap(), entities[0]);
        assert_eq!(manager.create_entity().unwrap().id(), 4);
    }

    #[test]
    fn test_destroy_clears_signature() {
        let mut manager = EntityManager::new(4);
        let entity = manager.create_entity().unwrap();
        manager
            .set_signature(entity, Signature::EMPTY.with(ComponentType::from_index(3)))
            .unwrap();

        manager.destroy_entity(entity).unwrap();
        assert!(manager.signature(entity).is_err());

        let recycled = manager.create_entity().unwrap();
        assert_eq!(recycled, entity);
        assert!(manager.signature(recycled).unwrap().is_empty());
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut manager = EntityManager::new(2);
        manager.create_entity().unwrap();
        manager.create_entity().unwrap();
        assert_eq!(
            manager.create_entity(),
            Err(EcsError::CapacityExceeded { what: "entities", limit: 2 })
        );
    }

    #[test]
    fn test_double_destroy_is_invalid() {
        let mut manager = EntityManager::new(2);
        let entity = manager.create_entity().unwrap();
        manager.destroy_entity(entity).unwrap();
        assert_eq!(manager.destroy_entity(entity), Err(EcsError::InvalidEntity(entity)));
        assert_eq!(
            manager.destroy_entity(Entity::from_raw(99)),
            Err(EcsError::InvalidEntity(Entity::from_raw(99)))
        );
    }

    #[test]
    fn test_iter_skips_dead() {
        let mut manager = EntityManager::new(4);
        let a = manager.create_entity().unwrap();
        let b = manager.create_entity().unwrap();
        let c = manager.create_entity().unwrap();
        manager.destroy_entity(b).unwrap();
        assert_eq!(manager.iter().collect::<Vec<_>>(), vec![a, c]);
    }
}
