//! # kinetic2d
//!
//! A fixed-timestep ECS runtime with 2D box collision.
//!
//! ## Features
//!
//! - **ECS Architecture**: dense component stores keyed by type, signature
//!   bitsets and automatically maintained system membership
//! - **Physics**: semi-implicit Euler integration with drag and speed limits
//! - **Broad Phase**: quadtree rebuilt every step from swept bounds
//! - **Narrow Phase**: continuous swept-AABB test with time of impact
//! - **Gameplay Dispatch**: doors, melee weapons, destructible props and
//!   triggers resolved by entity kind, reported as collision events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kinetic2d::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, sim: &mut Simulation) -> Result<(), AppError> {
//!         sim.spawn_body(
//!             "player",
//!             EntityKind::Player,
//!             Transform2D::new(Vec2::new(100.0, 100.0), Vec2::new(16.0, 16.0)),
//!             Rigidbody2D::new(1.0),
//!             false,
//!         )?;
//!         Ok(())
//!     }
//!
//!     fn fixed_update(
//!         &mut self,
//!         sim: &mut Simulation,
//!         events: &[CollisionEvent],
//!         dt: f32,
//!     ) -> Result<(), AppError> {
//!         // React to this step's collisions
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::default();
//!     let mut app = MyApp;
//!     Simulation::run(config, &mut app, std::iter::repeat(1.0 / 60.0).take(600))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;
pub mod time;

mod application;
mod simulation;

pub use application::{AppError, Application};
pub use simulation::{Simulation, SimulationError};

/// Common imports for simulation users
pub mod prelude {
    pub use crate::{
        collision::{CollisionStats, CollisionSystem},
        config::{CollisionConfig, Config, ConfigError, PhysicsConfig, SimulationConfig},
        ecs::components::{
            Animation, BoxCollider2D, CollisionFlags, MeleeWeapon, Rigidbody2D, Transform2D,
        },
        ecs::{Component, EcsError, Entity, World},
        events::{CollisionEvent, EventQueue},
        foundation::math::Vec2,
        physics::PhysicsSystem,
        scene::{DoorSide, EntityDirectory, EntityKind, GameObject, GameObjectDirectory},
        spatial::{Aabb, QuadTree, QuadTreeConfig},
        time::FrameController,
        AppError, Application, Simulation, SimulationError,
    };
}
