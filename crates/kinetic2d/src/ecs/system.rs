//! System registry
//!
//! Each registered system carries a required [`Signature`] and the live set
//! of entities whose signature contains it. Membership is recomputed whenever
//! an entity's signature changes.

use super::{Entity, Signature};
use log::debug;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashSet;

new_key_type! {
    /// Handle to a registered system
    pub struct SystemId;
}

#[derive(Debug)]
struct SystemEntry {
    name: String,
    signature: Signature,
    entities: HashSet<Entity>,
}

/// Tracks which entities belong to which system
#[derive(Debug, Default)]
pub struct SystemManager {
    systems: SlotMap<SystemId, SystemEntry>,
}

impl SystemManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system requiring `signature`, backfilled from `existing`
    pub fn register_system(
        &mut self,
        name: impl Into<String>,
        signature: Signature,
        existing: impl IntoIterator<Item = (Entity, Signature)>,
    ) -> SystemId {
        let entities = existing
            .into_iter()
            .filter(|(_, entity_signature)| entity_signature.matches(signature))
            .map(|(entity, _)| entity)
            .collect();
        let name = name.into();
        debug!("registered system '{name}' with {signature:?}");
        self.systems.insert(SystemEntry {
            name,
            signature,
            entities,
        })
    }

    /// Replace a system's signature and recompute membership from `existing`
    pub fn set_signature(
        &mut self,
        id: SystemId,
        signature: Signature,
        existing: impl IntoIterator<Item = (Entity, Signature)>,
    ) -> bool {
        let Some(entry) = self.systems.get_mut(id) else {
            return false;
        };
        entry.signature = signature;
        entry.entities = existing
            .into_iter()
            .filter(|(_, entity_signature)| entity_signature.matches(signature))
            .map(|(entity, _)| entity)
            .collect();
        true
    }

    /// Required signature of a system
    pub fn signature(&self, id: SystemId) -> Option<Signature> {
        self.systems.get(id).map(|entry| entry.signature)
    }

    /// Name given at registration
    pub fn name(&self, id: SystemId) -> Option<&str> {
        self.systems.get(id).map(|entry| entry.name.as_str())
    }

    /// Current members of a system
    pub fn entities(&self, id: SystemId) -> Option<&HashSet<Entity>> {
        self.systems.get(id).map(|entry| &entry.entities)
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Update every system's membership after `entity` changed signature
    pub fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in self.systems.values_mut() {
            if signature.matches(entry.signature) {
                entry.entities.insert(entity);
            } else {
                entry.entities.remove(&entity);
            }
        }
    }

    /// Remove `entity` from every system
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for entry in self.systems.values_mut() {
            entry.entities.remove(&entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentType;

    fn sig(bits: &[usize]) -> Signature {
        bits.iter().copied().map(ComponentType::from_index).collect()
    }

    #[test]
    fn test_membership_follows_signature() {
        let mut manager = SystemManager::new();
        let physics = manager.register_system("physics", sig(&[0, 1]), std::iter::empty());
        let entity = Entity::from_raw(0);

        manager.entity_signature_changed(entity, sig(&[0]));
        assert!(!manager.entities(physics).unwrap().contains(&entity));

        manager.entity_signature_changed(entity, sig(&[0, 1, 2]));
        assert!(manager.entities(physics).unwrap().contains(&entity));

        manager.entity_signature_changed(entity, sig(&[1, 2]));
        assert!(!manager.entities(physics).unwrap().contains(&entity));
    }

    #[test]
    fn test_register_backfills() {
        let mut manager = SystemManager::new();
        let existing = vec![
            (Entity::from_raw(0), sig(&[0, 1])),
            (Entity::from_raw(1), sig(&[1])),
            (Entity::from_raw(2), sig(&[0, 1, 5])),
        ];
        let id = manager.register_system("render", sig(&[0, 1]), existing);
        let members = manager.entities(id).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&Entity::from_raw(2)));
        assert_eq!(manager.name(id), Some("render"));
    }

    #[test]
    fn test_destroy_removes_everywhere() {
        let mut manager = SystemManager::new();
        let a = manager.register_system("a", sig(&[0]), std::iter::empty());
        let b = manager.register_system("b", Signature::EMPTY, std::iter::empty());
        let entity = Entity::from_raw(4);
        manager.entity_signature_changed(entity, sig(&[0]));
        manager.entity_destroyed(entity);
        assert!(manager.entities(a).unwrap().is_empty());
        assert!(manager.entities(b).unwrap().is_empty());
        assert_eq!(manager.system_count(), 2);
    }
}
