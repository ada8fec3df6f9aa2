//! Fixed-step rigid body integrator
//!
//! For every dynamic body in the system:
//! `a = F/m (+ g)`, `v += a*dt` clamped to the speed limit, `v *= drag` with
//! small components snapped to zero, then `x += v*dt`. Angular state follows
//! the same pattern. Kinematic bodies are skipped.

use crate::config::PhysicsConfig;
use crate::ecs::components::{Rigidbody2D, Transform2D};
use crate::ecs::{EcsResult, Signature, SystemId, World};
use crate::foundation::math::{utils::snap_to_zero, Vec2};
use log::debug;

/// Force scale applied when both axes are driven, so diagonal movement is
/// not faster than axis-aligned movement
pub const DIAGONAL_FORCE_SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Integrates every entity with a [`Transform2D`] and a [`Rigidbody2D`]
#[derive(Debug)]
pub struct PhysicsSystem {
    system: SystemId,
    config: PhysicsConfig,
}

impl PhysicsSystem {
    /// Register the system with `world`
    ///
    /// Both component types must already be registered.
    pub fn new(world: &mut World, config: PhysicsConfig) -> EcsResult<Self> {
        let signature = Signature::EMPTY
            .with(world.component_type::<Transform2D>()?)
            .with(world.component_type::<Rigidbody2D>()?);
        let system = world.register_system("physics", signature);
        debug!("physics system ready: {config:?}");
        Ok(Self { system, config })
    }

    /// Handle of the registered system
    pub const fn system_id(&self) -> SystemId {
        self.system
    }

    /// Active configuration
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance every dynamic body by `dt` seconds
    pub fn update(&self, world: &mut World, dt: f32) -> EcsResult<()> {
        for entity in world.system_entities(self.system) {
            let mut transform = *world.get_component::<Transform2D>(entity)?;
            let body = world.get_component_mut::<Rigidbody2D>(entity)?;
            if body.is_kinematic {
                continue;
            }

            self.integrate_linear(body, &mut transform, dt);
            self.integrate_angular(body, &mut transform, dt);

            *world.get_component_mut::<Transform2D>(entity)? = transform;
        }
        Ok(())
    }

    fn integrate_linear(&self, body: &mut Rigidbody2D, transform: &mut Transform2D, dt: f32) {
        body.position = transform.position;

        let force = if body.force.x != 0.0 && body.force.y != 0.0 {
            body.force * DIAGONAL_FORCE_SCALE
        } else {
            body.force
        };

        body.acceleration = force * body.inverse_mass;
        if body.use_gravity {
            body.acceleration += self.config.gravity;
        }

        body.velocity += body.acceleration * dt;

        let speed = body.velocity.norm();
        if speed > self.config.max_velocity {
            body.velocity *= self.config.max_velocity / speed;
        }

        body.velocity *= self.config.linear_drag;
        body.velocity = body
            .velocity
            .map(|component| snap_to_zero(component, self.config.velocity_epsilon));

        body.position += body.velocity * dt;
        transform.position = body.position;
    }

    fn integrate_angular(&self, body: &mut Rigidbody2D, transform: &mut Transform2D, dt: f32) {
        body.angle = transform.rotation;
        body.angular_acceleration = body.torque * body.inverse_inertia_mass;
        body.angular_velocity += body.angular_acceleration * dt;
        body.angular_velocity = body
            .angular_velocity
            .clamp(-self.config.max_angular_velocity, self.config.max_angular_velocity);
        body.angular_velocity = snap_to_zero(
            body.angular_velocity * self.config.angular_drag,
            self.config.velocity_epsilon,
        );
        body.angle += body.angular_velocity * dt;
        transform.rotation = body.angle;
    }

    /// Add a driving force
    pub fn add_force(body: &mut Rigidbody2D, force: Vec2) {
        body.force += force;
    }

    /// Drive along x, replacing any previous x force
    pub fn add_force_x(body: &mut Rigidbody2D, force: f32) {
        body.force.x = force;
    }

    /// Drive along y, replacing any previous y force
    pub fn add_force_y(body: &mut Rigidbody2D, force: f32) {
        body.force.y = force;
    }

    /// Stop driving along x and damp the x velocity
    pub fn remove_force_x(&self, body: &mut Rigidbody2D) {
        body.force.x = 0.0;
        body.velocity.x = snap_to_zero(body.velocity.x * self.config.linear_drag, self.config.velocity_epsilon);
    }

    /// Stop driving along y and damp the y velocity
    pub fn remove_force_y(&self, body: &mut Rigidbody2D) {
        body.force.y = 0.0;
        body.velocity.y = snap_to_zero(body.velocity.y * self.config.linear_drag, self.config.velocity_epsilon);
    }

    /// Add a driving torque
    pub fn add_torque(body: &mut Rigidbody2D, torque: f32) {
        body.torque += torque;
    }

    /// Stop driving rotation and damp the angular velocity
    pub fn remove_torque(&self, body: &mut Rigidbody2D) {
        body.torque = 0.0;
        body.angular_velocity = snap_to_zero(
            body.angular_velocity * self.config.angular_drag,
            self.config.velocity_epsilon,
        );
    }
}
