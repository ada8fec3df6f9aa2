//! Box collider component
//!
//! An axis-aligned box whose bounds follow the entity's [`Transform2D`].
//! The collision system refreshes the bounds every step and records which
//! sides were hit.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::spatial::Aabb;
use super::Transform2D;
use bitflags::bitflags;

bitflags! {
    /// Sides of a box involved in a contact
    ///
    /// TOP is the `min.y` side and BOTTOM the `max.y` side (+y points down).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionFlags: u8 {
        /// Contact on the `min.x` side
        const LEFT = 1;
        /// Contact on the `max.x` side
        const RIGHT = 2;
        /// Contact on the `min.y` side
        const TOP = 4;
        /// Contact on the `max.y` side
        const BOTTOM = 8;
    }
}

/// Component that marks an entity as having box collision enabled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider2D {
    /// World-space minimum corner
    pub min: Vec2,

    /// World-space maximum corner
    pub max: Vec2,

    /// Sides hit by the contact currently being resolved; cleared after
    /// resolution
    pub collision_flag: CollisionFlags,

    /// Every side touched during the current step, for gameplay reads
    pub touching: CollisionFlags,

    /// Is this a trigger volume (generates events but no physical response)?
    pub is_trigger: bool,

    /// Penetration depth recorded by the last overlapping contact
    pub overlap: f32,
}

impl Component for BoxCollider2D {}

impl Default for BoxCollider2D {
    fn default() -> Self {
        Self {
            min: Vec2::zeros(),
            max: Vec2::zeros(),
            collision_flag: CollisionFlags::empty(),
            touching: CollisionFlags::empty(),
            is_trigger: false,
            overlap: 0.0,
        }
    }
}

impl BoxCollider2D {
    /// Create a solid collider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collider with bounds taken from `transform`
    pub fn from_transform(transform: &Transform2D) -> Self {
        let mut collider = Self::default();
        collider.update_bounds(transform);
        collider
    }

    /// Builder: make this collider a trigger volume
    #[must_use]
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Recompute `min`/`max` from the transform
    pub fn update_bounds(&mut self, transform: &Transform2D) {
        let bounds = transform.bounds();
        self.min = bounds.min;
        self.max = bounds.max;
    }

    /// Current bounds
    pub const fn aabb(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    /// Record the sides hit by a contact
    pub fn mark(&mut self, flags: CollisionFlags) {
        self.collision_flag |= flags;
        self.touching |= flags;
    }

    /// Clear per-contact state after resolution
    pub fn reset_contact(&mut self) {
        self.collision_flag = CollisionFlags::empty();
        self.overlap = 0.0;
    }

    /// Clear all per-step state
    pub fn reset_step(&mut self) {
        self.reset_contact();
        self.touching = CollisionFlags::empty();
    }
}
