//! Simulation configuration
//!
//! Defaults reproduce a 60 Hz step over an 800x600 room.

use super::{Config, ConfigError};
use crate::foundation::math::Vec2;
use crate::spatial::{Aabb, QuadTreeConfig};
use serde::{Deserialize, Serialize};

/// Integrator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration applied to bodies with `use_gravity` (+y is down)
    pub gravity: Vec2,
    /// Speed limit for linear velocity
    pub max_velocity: f32,
    /// Per-step velocity multiplier; 1.0 disables drag
    pub linear_drag: f32,
    /// Limit for angular velocity magnitude
    pub max_angular_velocity: f32,
    /// Per-step angular velocity multiplier
    pub angular_drag: f32,
    /// Velocity components below this magnitude snap to zero
    pub velocity_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 9.8),
            max_velocity: 300.0,
            linear_drag: 1.0,
            max_angular_velocity: 10.0,
            angular_drag: 1.0,
            velocity_epsilon: 0.01,
        }
    }
}

impl PhysicsConfig {
    /// Set gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the linear speed limit
    #[must_use]
    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set linear and angular drag factors
    #[must_use]
    pub fn with_drag(mut self, linear: f32, angular: f32) -> Self {
        self.linear_drag = linear;
        self.angular_drag = angular;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_velocity > 0.0) || !(self.max_angular_velocity > 0.0) {
            return Err(ConfigError::Invalid("velocity limits must be positive".into()));
        }
        for (name, drag) in [("linear_drag", self.linear_drag), ("angular_drag", self.angular_drag)] {
            if !(0.0..=1.0).contains(&drag) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {drag}")));
            }
        }
        if self.velocity_epsilon < 0.0 {
            return Err(ConfigError::Invalid("velocity_epsilon must not be negative".into()));
        }
        Ok(())
    }
}

/// Collision system tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Extra gap left between boxes separated by static resolution
    pub separation_epsilon: f32,
    /// Keep dynamic boxes inside `world_bounds`
    pub clamp_to_world_bounds: bool,
    /// Knockback speed used when a weapon does not specify one
    pub default_knockback: f32,
    /// Room rectangle; also the quadtree root bounds
    pub world_bounds: Aabb,
    /// Quadtree split limits
    pub quadtree: QuadTreeConfig,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            separation_epsilon: 0.001,
            clamp_to_world_bounds: true,
            default_knockback: 150.0,
            world_bounds: Aabb::new(Vec2::zeros(), Vec2::new(800.0, 600.0)),
            quadtree: QuadTreeConfig::default(),
        }
    }
}

impl CollisionConfig {
    /// Set world bounds
    #[must_use]
    pub fn with_world_bounds(mut self, bounds: Aabb) -> Self {
        self.world_bounds = bounds;
        self
    }

    /// Set quadtree limits
    #[must_use]
    pub fn with_quadtree(mut self, quadtree: QuadTreeConfig) -> Self {
        self.quadtree = quadtree;
        self
    }

    /// Enable or disable the world-bounds clamp
    #[must_use]
    pub fn with_world_clamp(mut self, enabled: bool) -> Self {
        self.clamp_to_world_bounds = enabled;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = &self.world_bounds;
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(ConfigError::Invalid(format!("world bounds are empty: {bounds:?}")));
        }
        if self.quadtree.max_objects == 0 {
            return Err(ConfigError::Invalid("quadtree.max_objects must be at least 1".into()));
        }
        if self.separation_epsilon < 0.0 {
            return Err(ConfigError::Invalid("separation_epsilon must not be negative".into()));
        }
        Ok(())
    }
}

/// Top-level configuration for a [`crate::Simulation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Default log level for binaries (`"info"`, `"debug"`, ...)
    pub log_level: String,
    /// Length of one fixed step in seconds
    pub fixed_delta_time: f32,
    /// Steps released per frame at most; excess time is dropped
    pub max_steps_per_frame: u32,
    /// Living entity limit
    pub max_entities: usize,
    /// Integrator settings
    pub physics: PhysicsConfig,
    /// Collision settings
    pub collision: CollisionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_delta_time: 1.0 / 60.0,
            max_steps_per_frame: 5,
            max_entities: crate::ecs::DEFAULT_MAX_ENTITIES,
            physics: PhysicsConfig::default(),
            collision: CollisionConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed step length
    #[must_use]
    pub fn with_fixed_delta_time(mut self, dt: f32) -> Self {
        self.fixed_delta_time = dt;
        self
    }

    /// Set the per-frame step limit
    #[must_use]
    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps;
        self
    }

    /// Set the entity limit
    #[must_use]
    pub fn with_max_entities(mut self, max_entities: usize) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Set the log level name
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Replace physics settings
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Replace collision settings
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = collision;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_delta_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_delta_time must be positive, got {}",
                self.fixed_delta_time
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid("max_steps_per_frame must be at least 1".into()));
        }
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid("max_entities must be at least 1".into()));
        }
        self.physics.validate()?;
        self.collision.validate()
    }
}

impl Config for SimulationConfig {}
