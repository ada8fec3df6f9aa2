//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::ecs::EcsError;
use crate::events::CollisionEvent;
use crate::simulation::Simulation;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game or tool on top of the simulation.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Spawn the initial scene here.
    fn initialize(&mut self, sim: &mut Simulation) -> Result<(), AppError>;

    /// Run gameplay for one fixed step
    ///
    /// Called after physics and collision have run, with the events that
    /// step produced.
    ///
    /// # Arguments
    /// * `sim` - Mutable reference to the simulation
    /// * `events` - Collision events emitted during the step
    /// * `dt` - Fixed step length in seconds
    fn fixed_update(&mut self, sim: &mut Simulation, events: &[CollisionEvent], dt: f32) -> Result<(), AppError>;

    /// Called once per frame after all of its fixed steps
    fn frame_end(&mut self, _sim: &Simulation) -> Result<(), AppError> {
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called when the run loop finishes.
    fn cleanup(&mut self, _sim: &mut Simulation) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// ECS error raised by application code
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
