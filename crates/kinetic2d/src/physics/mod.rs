//! Physics module
//!
//! Semi-implicit Euler integration of [`Rigidbody2D`](crate::ecs::components::Rigidbody2D)
//! bodies. Collision detection and response live in [`crate::collision`].

pub mod integrator;

pub use integrator::{PhysicsSystem, DIAGONAL_FORCE_SCALE};
