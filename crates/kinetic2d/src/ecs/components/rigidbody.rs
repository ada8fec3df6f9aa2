//! Rigid body component for 2D dynamics
//!
//! Holds the linear and angular state integrated by the physics system.
//! Kinematic bodies are moved only by gameplay code; physics and collision
//! response never touch them.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Component for entities that take part in physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rigidbody2D {
    /// Mirror of the transform position
    pub position: Vec2,

    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Acceleration computed during the last step
    pub acceleration: Vec2,

    /// Accumulated driving force
    pub force: Vec2,

    /// Mass
    pub mass: f32,

    /// Cached `1 / mass`
    pub inverse_mass: f32,

    /// Rotation in radians
    pub angle: f32,

    /// Angular velocity in radians per second
    pub angular_velocity: f32,

    /// Angular acceleration computed during the last step
    pub angular_acceleration: f32,

    /// Accumulated torque
    pub torque: f32,

    /// Rotational inertia
    pub inertia_mass: f32,

    /// Cached `1 / inertia_mass`
    pub inverse_inertia_mass: f32,

    /// Apply world gravity during integration
    pub use_gravity: bool,

    /// Excluded from integration and collision response
    pub is_kinematic: bool,
}

impl Component for Rigidbody2D {}

impl Default for Rigidbody2D {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Rigidbody2D {
    /// Create a dynamic body with the given mass
    pub fn new(mass: f32) -> Self {
        let mut body = Self {
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            force: Vec2::zeros(),
            mass: 1.0,
            inverse_mass: 1.0,
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            torque: 0.0,
            inertia_mass: 1.0,
            inverse_inertia_mass: 1.0,
            use_gravity: false,
            is_kinematic: false,
        };
        body.set_mass(mass);
        body
    }

    /// Create a kinematic body
    pub fn kinematic() -> Self {
        Self {
            is_kinematic: true,
            ..Self::new(1.0)
        }
    }

    /// Builder: initial velocity
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: enable gravity
    #[must_use]
    pub fn with_gravity(mut self) -> Self {
        self.use_gravity = true;
        self
    }

    /// Builder: rotational inertia
    #[must_use]
    pub fn with_inertia(mut self, inertia: f32) -> Self {
        self.set_inertia(inertia);
        self
    }

    /// Set mass; non-positive mass makes the body immovable by force
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// Set rotational inertia; non-positive inertia ignores torque
    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia_mass = inertia;
        self.inverse_inertia_mass = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };
    }

    /// Dynamic bodies are integrated and resolved
    pub const fn is_dynamic(&self) -> bool {
        !self.is_kinematic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_mass() {
        let body = Rigidbody2D::new(4.0);
        assert_relative_eq!(body.inverse_mass, 0.25);

        let massless = Rigidbody2D::new(0.0);
        assert_relative_eq!(massless.inverse_mass, 0.0);
    }

    #[test]
    fn test_kinematic_builder() {
        let body = Rigidbody2D::kinematic().with_velocity(Vec2::new(1.0, 0.0));
        assert!(body.is_kinematic);
        assert!(!body.is_dynamic());
        assert_relative_eq!(body.velocity.x, 1.0);
    }
}
