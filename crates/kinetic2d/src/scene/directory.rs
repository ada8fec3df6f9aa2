//! Entity directory
//!
//! Gameplay identity lives outside the ECS stores: the collision system asks
//! an [`EntityDirectory`] whether an entity is active and what kind it is.

use crate::ecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wall of the room a door is set into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSide {
    /// `min.x` wall
    Left,
    /// `max.x` wall
    Right,
    /// `min.y` wall
    Top,
    /// `max.y` wall
    Bottom,
}

/// Gameplay category used to pick a collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player character
    Player,
    /// Hostile character; bounces off the room walls
    Enemy,
    /// Walls and static scenery
    Environment,
    /// Room exit on the given wall
    Door(DoorSide),
    /// Melee hitbox
    Weapon,
    /// Destructible scenery
    Prop,
    /// Collectible; never blocks movement
    Pickup,
}

/// Directory record for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Display name
    pub name: String,
    /// Collision category
    pub kind: EntityKind,
    /// Inactive objects are skipped by collision
    pub active: bool,
}

impl GameObject {
    /// Create an active object
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            active: true,
        }
    }
}

/// Lookup from entity to gameplay identity
///
/// Entities without a record are treated as active [`EntityKind::Environment`].
pub trait EntityDirectory {
    /// Record for `entity`, if any
    fn game_object(&self, entity: Entity) -> Option<&GameObject>;

    /// Whether collision should consider `entity`
    fn is_active(&self, entity: Entity) -> bool {
        self.game_object(entity).map_or(true, |object| object.active)
    }

    /// Collision category of `entity`
    fn kind(&self, entity: Entity) -> EntityKind {
        self.game_object(entity)
            .map_or(EntityKind::Environment, |object| object.kind)
    }
}

/// Hash map backed [`EntityDirectory`]
#[derive(Debug, Clone, Default)]
pub struct GameObjectDirectory {
    objects: HashMap<Entity, GameObject>,
}

impl GameObjectDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `entity`
    pub fn insert(&mut self, entity: Entity, object: GameObject) -> Option<GameObject> {
        self.objects.insert(entity, object)
    }

    /// Remove the record for `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<GameObject> {
        self.objects.remove(&entity)
    }

    /// Borrow a record
    pub fn get(&self, entity: Entity) -> Option<&GameObject> {
        self.objects.get(&entity)
    }

    /// Mutably borrow a record
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut GameObject> {
        self.objects.get_mut(&entity)
    }

    /// Toggle the active flag; returns false for unknown entities
    pub fn set_active(&mut self, entity: Entity, active: bool) -> bool {
        self.objects
            .get_mut(&entity)
            .map(|object| object.active = active)
            .is_some()
    }

    /// First entity with the given name, lowest id first
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.objects
            .iter()
            .filter(|(_, object)| object.name == name)
            .map(|(entity, _)| *entity)
            .min()
    }

    /// Entities of the given kind, sorted by id
    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<Entity> {
        let mut entities: Vec<_> = self
            .objects
            .iter()
            .filter(|(_, object)| object.kind == kind)
            .map(|(entity, _)| *entity)
            .collect();
        entities.sort_unstable();
        entities
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over all records
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &GameObject)> {
        self.objects.iter().map(|(entity, object)| (*entity, object))
    }
}

impl EntityDirectory for GameObjectDirectory {
    fn game_object(&self, entity: Entity) -> Option<&GameObject> {
        self.objects.get(&entity)
    }
}
