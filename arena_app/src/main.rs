//! Arena demo application
//!
//! Runs one room headless: a player swinging a sword, wandering enemies,
//! destructible crates, two pillars and a door on every wall. Collision
//! events are tallied and summarised when the run ends.
//!
//! Usage: `arena_demo [config.toml|config.ron]`

use kinetic2d::foundation::logging;
use kinetic2d::prelude::*;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const FRAMES: usize = 1800;
const SEED: u64 = 7;

const PLAYER_SIZE: f32 = 24.0;
const PLAYER_FORCE: f32 = 240.0;
const SWORD_REACH: f32 = 22.0;
const SWING_PERIOD: f32 = 0.75;
const ENEMY_COUNT: usize = 6;
const ENEMY_HEALTH: f32 = 30.0;
const TURN_PERIOD: f32 = 1.5;

/// Counts of each collision event kind
#[derive(Debug, Default)]
struct EventTally {
    contacts: usize,
    triggers: usize,
    doors: usize,
    melee_hits: usize,
    prop_hits: usize,
    props_destroyed: usize,
    enemies_defeated: usize,
}

/// Entities the gameplay script drives
#[derive(Debug, Clone, Copy)]
struct Actors {
    player: Entity,
    sword: Entity,
}

struct ArenaApp {
    rng: StdRng,
    actors: Option<Actors>,
    enemy_health: HashMap<Entity, f32>,
    facing: Vec2,
    turn_timer: f32,
    swing_timer: f32,
    tally: EventTally,
}

impl ArenaApp {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            actors: None,
            enemy_health: HashMap::new(),
            facing: Vec2::new(1.0, 0.0),
            turn_timer: 0.0,
            swing_timer: 0.0,
            tally: EventTally::default(),
        }
    }

    fn actors(&self) -> Result<Actors, AppError> {
        self.actors
            .ok_or_else(|| AppError::GameLogic("arena has no player".to_string()))
    }

    fn spawn_doors(sim: &mut Simulation, room: Aabb) -> Result<(), AppError> {
        let center = room.center();
        let doors = [
            (DoorSide::Left, Vec2::new(room.min.x + 10.0, center.y), Vec2::new(20.0, 80.0)),
            (DoorSide::Right, Vec2::new(room.max.x - 10.0, center.y), Vec2::new(20.0, 80.0)),
            (DoorSide::Top, Vec2::new(center.x, room.min.y + 10.0), Vec2::new(80.0, 20.0)),
            (DoorSide::Bottom, Vec2::new(center.x, room.max.y - 10.0), Vec2::new(80.0, 20.0)),
        ];
        for (side, position, size) in doors {
            sim.spawn_body(
                format!("door {side:?}"),
                EntityKind::Door(side),
                Transform2D::new(position, size),
                Rigidbody2D::kinematic(),
                true,
            )?;
        }
        Ok(())
    }

    fn spawn_enemies(&mut self, sim: &mut Simulation, room: Aabb) -> Result<(), AppError> {
        for index in 0..ENEMY_COUNT {
            let position = Vec2::new(
                self.rng.gen_range(room.min.x + 60.0..room.max.x - 60.0),
                self.rng.gen_range(room.min.y + 60.0..room.max.y - 60.0),
            );
            let velocity = Vec2::new(self.rng.gen_range(-90.0..90.0), self.rng.gen_range(-90.0..90.0));
            let enemy = sim.spawn_body(
                format!("enemy {index}"),
                EntityKind::Enemy,
                Transform2D::new(position, Vec2::new(20.0, 20.0)),
                Rigidbody2D::new(1.5).with_velocity(velocity),
                false,
            )?;
            self.enemy_health.insert(enemy, ENEMY_HEALTH);
        }
        Ok(())
    }

    fn spawn_props(sim: &mut Simulation, room: Aabb) -> Result<(), AppError> {
        let template = sim.spawn_body(
            "crate 0",
            EntityKind::Prop,
            Transform2D::new(room.min + Vec2::new(120.0, 120.0), Vec2::new(28.0, 28.0)),
            Rigidbody2D::kinematic(),
            false,
        )?;
        sim.world.add_component(template, Animation::new(4, 0.1).once())?;

        for (index, offset) in [Vec2::new(-120.0, 120.0), Vec2::new(120.0, -120.0)].into_iter().enumerate() {
            let copy = sim.clone_entity(template, format!("crate {}", index + 1))?;
            let corner = if offset.x < 0.0 {
                Vec2::new(room.max.x, room.min.y)
            } else {
                Vec2::new(room.min.x, room.max.y)
            };
            sim.world.get_component_mut::<Transform2D>(copy)?.position = corner + offset;
        }
        Ok(())
    }

    fn handle_events(&mut self, sim: &mut Simulation, events: &[CollisionEvent]) -> Result<(), AppError> {
        for event in events {
            match *event {
                CollisionEvent::Contact { .. } => self.tally.contacts += 1,
                CollisionEvent::TriggerEntered { .. } => self.tally.triggers += 1,
                CollisionEvent::DoorEntered { player, side, .. } => {
                    self.tally.doors += 1;
                    info!("{player} left the room through the {side:?} door");
                }
                CollisionEvent::MeleeHit { target, damage, .. } => {
                    self.tally.melee_hits += 1;
                    let Some(health) = self.enemy_health.get_mut(&target) else {
                        continue;
                    };
                    *health -= damage;
                    if *health <= 0.0 {
                        self.enemy_health.remove(&target);
                        sim.despawn(target)?;
                        self.tally.enemies_defeated += 1;
                        info!("{target} defeated, {} enemies left", self.enemy_health.len());
                    }
                }
                CollisionEvent::PropHit { prop, frame, destroyed, .. } => {
                    self.tally.prop_hits += 1;
                    debug!("{prop} cracked to frame {frame}");
                    if destroyed {
                        self.tally.props_destroyed += 1;
                        sim.directory.set_active(prop, false);
                        info!("{prop} destroyed");
                    }
                }
            }
        }
        Ok(())
    }

    /// Pick a new heading now and then and drive the player with forces
    fn steer_player(&mut self, sim: &mut Simulation, player: Entity, dt: f32) -> Result<(), AppError> {
        self.turn_timer -= dt;
        if self.turn_timer <= 0.0 {
            self.turn_timer = TURN_PERIOD;
            let heading = Vec2::new(
                f32::from(self.rng.gen_range(-1_i8..=1)),
                f32::from(self.rng.gen_range(-1_i8..=1)),
            );
            if heading != Vec2::zeros() {
                self.facing = heading.normalize();
            }
            let mut body = *sim.world.get_component::<Rigidbody2D>(player)?;
            if heading.x == 0.0 {
                sim.physics().remove_force_x(&mut body);
            } else {
                PhysicsSystem::add_force_x(&mut body, heading.x * PLAYER_FORCE);
            }
            if heading.y == 0.0 {
                sim.physics().remove_force_y(&mut body);
            } else {
                PhysicsSystem::add_force_y(&mut body, heading.y * PLAYER_FORCE);
            }
            *sim.world.get_component_mut::<Rigidbody2D>(player)? = body;
        }
        Ok(())
    }

    /// Keep the sword in front of the player and swing it periodically
    fn swing_sword(&mut self, sim: &mut Simulation, actors: Actors, dt: f32) -> Result<(), AppError> {
        let player_position = sim.world.get_component::<Transform2D>(actors.player)?.position;
        let sword = sim.world.get_component_mut::<Transform2D>(actors.sword)?;
        sword.position = player_position + self.facing * SWORD_REACH;

        self.swing_timer -= dt;
        let animation = sim.world.get_component_mut::<Animation>(actors.player)?;
        if self.swing_timer <= 0.0 {
            self.swing_timer = SWING_PERIOD;
            animation.play();
        }
        animation.tick(dt);
        if animation.current_frame == animation.last_frame() {
            animation.stop();
        }
        Ok(())
    }
}

impl Application for ArenaApp {
    fn initialize(&mut self, sim: &mut Simulation) -> Result<(), AppError> {
        info!("Loading arena scene...");
        let room = sim.config().collision.world_bounds;
        let center = room.center();

        for (index, offset) in [Vec2::new(-160.0, -90.0), Vec2::new(160.0, 90.0)].into_iter().enumerate() {
            sim.spawn_body(
                format!("pillar {index}"),
                EntityKind::Environment,
                Transform2D::new(center + offset, Vec2::new(40.0, 40.0)),
                Rigidbody2D::kinematic(),
                false,
            )?;
        }
        Self::spawn_doors(sim, room)?;

        let player = sim.spawn_body(
            "player",
            EntityKind::Player,
            Transform2D::new(center, Vec2::new(PLAYER_SIZE, PLAYER_SIZE)),
            Rigidbody2D::new(1.0),
            false,
        )?;
        sim.world.add_component(player, Animation::new(6, 0.06))?;

        let sword = sim.spawn_body(
            "sword",
            EntityKind::Weapon,
            Transform2D::new(center + self.facing * SWORD_REACH, Vec2::new(26.0, 26.0)),
            Rigidbody2D::kinematic(),
            true,
        )?;
        sim.world.add_component(sword, MeleeWeapon::new(player, 10.0, 0.0, 2..=4))?;
        self.actors = Some(Actors { player, sword });

        self.spawn_enemies(sim, room)?;
        Self::spawn_props(sim, room)?;

        info!("Arena ready: {} objects", sim.directory.len());
        Ok(())
    }

    fn fixed_update(&mut self, sim: &mut Simulation, events: &[CollisionEvent], dt: f32) -> Result<(), AppError> {
        let actors = self.actors()?;
        self.handle_events(sim, events)?;
        self.steer_player(sim, actors.player, dt)?;
        self.swing_sword(sim, actors, dt)?;

        if self.enemy_health.is_empty() {
            info!("All enemies defeated");
            sim.quit();
        }
        Ok(())
    }

    fn frame_end(&mut self, sim: &Simulation) -> Result<(), AppError> {
        let frames = sim.frame_controller();
        if frames.frame_count() % 300 == 0 {
            let stats = sim.collision().stats();
            debug!(
                "frame {}: {} steps so far, {} indexed, {} pairs, {} contacts, quadtree depth {}",
                frames.frame_count(),
                frames.total_steps(),
                stats.indexed,
                stats.pairs_tested,
                stats.contacts,
                sim.collision().quadtree().depth()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, sim: &mut Simulation) {
        info!("Arena summary: {:?}", self.tally);
        info!(
            "{} entities alive, {} time dropped by the step limit",
            sim.world.entity_count(),
            sim.frame_controller().dropped_time()
        );
    }
}

/// Jittered frame times around the fixed step, with an occasional long hitch
fn frame_times(fixed_delta_time: f32, rng: &mut StdRng) -> Vec<f64> {
    let base = f64::from(fixed_delta_time);
    (0..FRAMES)
        .map(|frame| {
            if frame % 600 == 599 {
                0.25
            } else {
                base * rng.gen_range(0.5..1.6)
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_from_file(&path)?,
        None => SimulationConfig::default(),
    };
    logging::init_with_level(logging::parse_level(&config.log_level));

    info!("Starting arena demo");
    let mut rng = StdRng::seed_from_u64(SEED);
    let frames = frame_times(config.fixed_delta_time, &mut rng);

    let mut app = ArenaApp::new(SEED + 1);
    let sim = Simulation::run(config, &mut app, frames)?;

    info!(
        "Arena demo finished after {} steps",
        sim.frame_controller().total_steps()
    );
    Ok(())
}
