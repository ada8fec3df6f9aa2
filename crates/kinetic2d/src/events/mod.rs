//! Collision events
//!
//! The collision system pushes one event per handled contact into an
//! [`EventQueue`]. The simulation drains the queue after every fixed step and
//! hands the batch to the application, so events never outlive their step.

use crate::ecs::components::CollisionFlags;
use crate::ecs::Entity;
use crate::scene::DoorSide;

/// Something the collision pass reports to gameplay
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    /// Two solid boxes touched and were resolved physically
    Contact {
        /// Lower-id entity of the pair
        a: Entity,
        /// Higher-id entity of the pair
        b: Entity,
        /// Seconds into the step, in `[0, dt]`, at which the boxes met (0 when already overlapping)
        time_of_impact: f32,
        /// Sides of `a` that were hit
        sides_a: CollisionFlags,
        /// Sides of `b` that were hit
        sides_b: CollisionFlags,
    },

    /// A box touched a trigger or event-only volume
    TriggerEntered {
        /// The trigger volume
        trigger: Entity,
        /// The entity that touched it
        other: Entity,
    },

    /// The player walked through a door and was moved to the far side
    DoorEntered {
        /// Player entity
        player: Entity,
        /// Door entity
        door: Entity,
        /// Wall the door sits on
        side: DoorSide,
    },

    /// A weapon hit a character during an active frame
    MeleeHit {
        /// Weapon hitbox
        weapon: Entity,
        /// Owner of the weapon
        attacker: Entity,
        /// Entity that was hit
        target: Entity,
        /// Damage carried by the weapon
        damage: f32,
        /// Knockback speed applied to the target
        knockback: f32,
    },

    /// A weapon hit a destructible prop
    PropHit {
        /// Weapon hitbox
        weapon: Entity,
        /// Prop that was hit
        prop: Entity,
        /// Prop frame after the hit
        frame: u32,
        /// The prop reached its last frame
        destroyed: bool,
    },
}

impl CollisionEvent {
    /// Short name of the event kind, for logs and counters
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Contact { .. } => "contact",
            Self::TriggerEntered { .. } => "trigger",
            Self::DoorEntered { .. } => "door",
            Self::MeleeHit { .. } => "melee",
            Self::PropHit { .. } => "prop",
        }
    }

    /// Check whether `entity` takes part in this event
    pub fn involves(&self, entity: Entity) -> bool {
        match *self {
            Self::Contact { a, b, .. } => a == entity || b == entity,
            Self::TriggerEntered { trigger, other } => trigger == entity || other == entity,
            Self::DoorEntered { player, door, .. } => player == entity || door == entity,
            Self::MeleeHit {
                weapon,
                attacker,
                target,
                ..
            } => weapon == entity || attacker == entity || target == entity,
            Self::PropHit { weapon, prop, .. } => weapon == entity || prop == entity,
        }
    }
}

/// FIFO buffer of collision events for one step
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<CollisionEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event
    pub fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    /// Take all queued events in push order
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate without draining
    pub fn iter(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop queued events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
