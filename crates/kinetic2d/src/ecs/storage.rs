//! Dense component storage
//!
//! Each component type lives in its own [`ComponentStore`]: a packed `Vec`
//! of values plus a two-way map between entities and slots. Removal swaps the
//! last value into the hole, so the array never fragments.

use super::{Component, Entity};
use std::any::Any;
use std::collections::HashMap;

/// Packed storage for one component type
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    values: Vec<T>,
    owners: Vec<Entity>,
    entity_to_index: HashMap<Entity, usize>,
}

impl<T> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            owners: Vec::new(),
            entity_to_index: HashMap::new(),
        }
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check whether `entity` has a value in this store
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Insert or overwrite the value for `entity`, returning any previous value
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&index) = self.entity_to_index.get(&entity) {
            return Some(std::mem::replace(&mut self.values[index], value));
        }
        self.entity_to_index.insert(entity, self.values.len());
        self.values.push(value);
        self.owners.push(entity);
        None
    }

    /// Remove the value for `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_to_index.remove(&entity)?;
        let last = self.values.len() - 1;
        if index != last {
            let moved = self.owners[last];
            self.entity_to_index.insert(moved, index);
        }
        self.owners.swap_remove(index);
        Some(self.values.swap_remove(index))
    }

    /// Borrow the value for `entity`
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.entity_to_index.get(&entity).map(|&index| &self.values[index])
    }

    /// Mutably borrow the value for `entity`
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = *self.entity_to_index.get(&entity)?;
        Some(&mut self.values[index])
    }

    /// Entities in slot order
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// Iterate over `(entity, value)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.values.iter())
    }

    /// Iterate mutably over `(entity, value)` pairs in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStore`] used by the component manager
pub(crate) trait ErasedStore: Send + Sync {
    /// Drop the entity's value if present
    fn remove_entity(&mut self, entity: Entity) -> bool;
    /// Check for a value
    fn contains(&self, entity: Entity) -> bool;
    /// Deep-copy the value of `source` onto `target`
    fn copy_entity(&mut self, source: Entity, target: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    fn copy_entity(&mut self, source: Entity, target: Entity) -> bool {
        match self.get(source).cloned() {
            Some(value) => {
                self.insert(target, value);
                true
            }
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
