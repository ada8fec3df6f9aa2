//! Simulation context
//!
//! [`Simulation`] owns the world, the entity directory, both systems and the
//! frame controller. One fixed step runs physics, then collision, then hands
//! the step's events to the [`Application`].

use crate::application::{AppError, Application};
use crate::config::{ConfigError, SimulationConfig};
use crate::collision::CollisionSystem;
use crate::ecs::components::{Animation, BoxCollider2D, MeleeWeapon, Rigidbody2D, Transform2D};
use crate::ecs::{EcsError, Entity, World};
use crate::events::{CollisionEvent, EventQueue};
use crate::physics::PhysicsSystem;
use crate::scene::{EntityDirectory, EntityKind, GameObject, GameObjectDirectory};
use crate::time::FrameController;
use log::{debug, error, info, trace};
use thiserror::Error;

/// Explicit simulation context passed to application hooks
#[derive(Debug)]
pub struct Simulation {
    /// ECS world holding every entity and component
    pub world: World,

    /// Name, kind and active flag per entity
    pub directory: GameObjectDirectory,

    physics: PhysicsSystem,
    collision: CollisionSystem,
    frames: FrameController,
    events: EventQueue,
    config: SimulationConfig,
    running: bool,
}

impl Simulation {
    /// Create a simulation with the built-in components and systems registered
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        info!(
            "Initializing simulation: dt={}s, max {} steps/frame, {} entities",
            config.fixed_delta_time, config.max_steps_per_frame, config.max_entities
        );

        let mut world = World::new(config.max_entities);
        world.register_component::<Transform2D>()?;
        world.register_component::<Rigidbody2D>()?;
        world.register_component::<BoxCollider2D>()?;
        world.register_component::<Animation>()?;
        world.register_component::<MeleeWeapon>()?;

        let physics = PhysicsSystem::new(&mut world, config.physics.clone())?;
        let collision = CollisionSystem::new(&mut world, config.collision.clone())?;

        Ok(Self {
            world,
            directory: GameObjectDirectory::new(),
            physics,
            collision,
            frames: FrameController::from_config(&config),
            events: EventQueue::new(),
            config,
            running: true,
        })
    }

    /// Run `app` over a sequence of frame times
    ///
    /// Stops early when the application calls [`quit`](Self::quit).
    /// Returns the final simulation state.
    pub fn run<A: Application>(
        config: SimulationConfig,
        app: &mut A,
        frame_times: impl IntoIterator<Item = f64>,
    ) -> Result<Self, SimulationError> {
        let mut sim = Self::new(config)?;
        app.initialize(&mut sim)?;
        info!("Scene loaded with {} entities", sim.world.entity_count());

        for frame_time in frame_times {
            if !sim.running {
                break;
            }
            sim.run_frame(app, frame_time)?;
        }

        app.cleanup(&mut sim);
        info!(
            "Simulation finished after {} steps over {} frames",
            sim.frames.total_steps(),
            sim.frames.frame_count()
        );
        Ok(sim)
    }

    /// Advance by one frame of `frame_time` seconds
    ///
    /// Returns the number of fixed steps that ran.
    pub fn run_frame<A: Application>(&mut self, app: &mut A, frame_time: f64) -> Result<u32, SimulationError> {
        let steps = self.frames.advance(frame_time);
        let dt = self.frames.fixed_delta_time();
        for _ in 0..steps {
            let events = self.step()?;
            app.fixed_update(self, &events, dt)?;
        }
        app.frame_end(self)?;
        Ok(steps)
    }

    /// Run one fixed step of physics and collision and return its events
    pub fn step(&mut self) -> Result<Vec<CollisionEvent>, SimulationError> {
        let dt = self.frames.fixed_delta_time();
        if let Err(e) = self.physics.update(&mut self.world, dt) {
            error!("Physics step failed: {e}");
            return Err(e.into());
        }
        match self
            .collision
            .update(&mut self.world, &self.directory, &mut self.events, dt)
        {
            Ok(stats) => trace!("step stats: {stats:?}"),
            Err(e) => {
                error!("Collision step failed: {e}");
                self.events.clear();
                return Err(e.into());
            }
        }
        Ok(self.events.drain())
    }

    /// Create an entity and record it in the directory
    pub fn spawn(&mut self, name: impl Into<String>, kind: EntityKind) -> Result<Entity, EcsError> {
        let entity = self.world.create_entity()?;
        let object = GameObject::new(name, kind);
        debug!("Spawned {entity} '{}' as {kind:?}", object.name);
        self.directory.insert(entity, object);
        Ok(entity)
    }

    /// Spawn an entity with a transform, a box collider sized to it and a rigid body
    pub fn spawn_body(
        &mut self,
        name: impl Into<String>,
        kind: EntityKind,
        transform: Transform2D,
        rigidbody: Rigidbody2D,
        is_trigger: bool,
    ) -> Result<Entity, EcsError> {
        let entity = self.spawn(name, kind)?;
        let mut collider = BoxCollider2D::from_transform(&transform);
        collider.is_trigger = is_trigger;
        self.world.add_component(entity, transform)?;
        self.world.add_component(entity, collider)?;
        self.world.add_component(entity, rigidbody)?;
        Ok(entity)
    }

    /// Copy an entity, its components and its directory entry under a new name
    pub fn clone_entity(&mut self, source: Entity, name: impl Into<String>) -> Result<Entity, EcsError> {
        let entity = self.world.clone_entity(source)?;
        let kind = self.directory.kind(source);
        self.directory.insert(entity, GameObject::new(name, kind));
        Ok(entity)
    }

    /// Destroy an entity and drop its directory entry
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.world.destroy_entity(entity)?;
        self.directory.remove(entity);
        debug!("Despawned {entity}");
        Ok(())
    }

    /// Request the run loop to stop after the current frame
    pub fn quit(&mut self) {
        info!("Simulation shutdown requested");
        self.running = false;
    }

    /// Whether the run loop continues
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Physics integrator
    pub const fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    /// Collision system
    pub const fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    /// Frame pacing state
    pub const fn frame_controller(&self) -> &FrameController {
        &self.frames
    }

    /// Active configuration
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

/// Simulation-level errors
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Structural ECS error
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application hook error
    #[error("Application error: {0}")]
    Application(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        initialized: bool,
        steps: u32,
        frames: u32,
        events: Vec<CollisionEvent>,
        cleaned_up: bool,
        quit_after: Option<u32>,
    }

    impl Application for Recorder {
        fn initialize(&mut self, sim: &mut Simulation) -> Result<(), AppError> {
            self.initialized = true;
            sim.spawn_body(
                "floor",
                EntityKind::Environment,
                Transform2D::new(Vec2::new(400.0, 590.0), Vec2::new(800.0, 20.0)),
                Rigidbody2D::kinematic(),
                false,
            )?;
            Ok(())
        }

        fn fixed_update(&mut self, sim: &mut Simulation, events: &[CollisionEvent], _dt: f32) -> Result<(), AppError> {
            self.steps += 1;
            self.events.extend_from_slice(events);
            if self.quit_after == Some(self.steps) {
                sim.quit();
            }
            Ok(())
        }

        fn frame_end(&mut self, _sim: &Simulation) -> Result<(), AppError> {
            self.frames += 1;
            Ok(())
        }

        fn cleanup(&mut self, _sim: &mut Simulation) {
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig::default().with_fixed_delta_time(0.0);
        assert!(matches!(Simulation::new(config), Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_run_drives_application_hooks() {
        let mut app = Recorder::default();
        let frame = 1.0 / 60.0;
        let sim = Simulation::run(SimulationConfig::default(), &mut app, [frame; 4]).unwrap();

        assert!(app.initialized);
        assert!(app.cleaned_up);
        assert_eq!(app.frames, 4);
        assert_eq!(u64::from(app.steps), sim.frame_controller().total_steps());
        assert_eq!(sim.world.entity_count(), 1);
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut app = Recorder {
            quit_after: Some(1),
            ..Recorder::default()
        };
        let sim = Simulation::run(SimulationConfig::default(), &mut app, [0.02; 10]).unwrap();
        assert!(!sim.is_running());
        assert_eq!(app.frames, 1);
        assert_eq!(app.steps, 1);
    }

    #[test]
    fn test_step_integrates_then_collides() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let ball = sim
            .spawn_body(
                "ball",
                EntityKind::Enemy,
                Transform2D::new(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0)),
                Rigidbody2D::new(1.0).with_velocity(Vec2::new(60.0, 0.0)),
                false,
            )
            .unwrap();

        let events = sim.step().unwrap();
        assert!(events.is_empty());
        // Drag defaults to 1.0, so the body keeps its speed
        let transform = sim.world.get_component::<Transform2D>(ball).unwrap();
        assert_relative_eq!(transform.position.x, 101.0, epsilon = 1e-4);
    }

    #[test]
    fn test_spawn_clone_and_despawn() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let crate_prop = sim
            .spawn_body(
                "crate",
                EntityKind::Prop,
                Transform2D::new(Vec2::new(50.0, 50.0), Vec2::new(16.0, 16.0)),
                Rigidbody2D::kinematic(),
                false,
            )
            .unwrap();
        let copy = sim.clone_entity(crate_prop, "crate 2").unwrap();

        assert_ne!(copy, crate_prop);
        assert_eq!(sim.directory.kind(copy), EntityKind::Prop);
        assert_eq!(sim.directory.find_by_name("crate 2"), Some(copy));
        assert!(sim.world.has_component::<BoxCollider2D>(copy));

        sim.despawn(crate_prop).unwrap();
        assert!(sim.directory.get(crate_prop).is_none());
        assert!(!sim.world.is_alive(crate_prop));
        assert!(sim.despawn(crate_prop).is_err());
    }

    #[test]
    fn test_capacity_is_reported() {
        let config = SimulationConfig::default().with_max_entities(1);
        let mut sim = Simulation::new(config).unwrap();
        sim.spawn("one", EntityKind::Environment).unwrap();
        assert!(matches!(
            sim.spawn("two", EntityKind::Environment),
            Err(EcsError::CapacityExceeded { .. })
        ));
        assert_eq!(sim.directory.len(), 1);
    }
}
