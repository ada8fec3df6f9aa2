//! End-to-end checks through the public simulation API

use approx::assert_relative_eq;
use kinetic2d::collision::box_box_intersection;
use kinetic2d::prelude::*;

fn sim_with(config: SimulationConfig) -> Simulation {
    Simulation::new(config).unwrap()
}

fn square(sim: &mut Simulation, name: &str, kind: EntityKind, x: f32, y: f32, size: f32, body: Rigidbody2D) -> Entity {
    sim.spawn_body(
        name,
        kind,
        Transform2D::new(Vec2::new(x, y), Vec2::new(size, size)),
        body,
        false,
    )
    .unwrap()
}

fn position(sim: &Simulation, entity: Entity) -> Vec2 {
    sim.world.get_component::<Transform2D>(entity).unwrap().position
}

#[test]
fn swept_boxes_report_time_of_impact() {
    let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Aabb::new(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0));

    assert!(box_box_intersection(&a, Vec2::new(5.0, 0.0), &b, Vec2::zeros(), 1.0).is_none());

    let contact = box_box_intersection(&a, Vec2::new(15.0, 0.0), &b, Vec2::zeros(), 1.0).unwrap();
    assert_relative_eq!(contact.time_of_impact, 0.667, epsilon = 1e-3);
    assert_eq!(contact.flags_a, CollisionFlags::RIGHT);
    assert_eq!(contact.flags_b, CollisionFlags::LEFT);
}

#[test]
fn fast_body_does_not_tunnel_through_thin_wall() {
    let config = SimulationConfig::default()
        .with_physics(PhysicsConfig::default().with_max_velocity(10_000.0));
    let mut sim = sim_with(config);
    let bullet = square(
        &mut sim,
        "bullet",
        EntityKind::Enemy,
        100.0,
        300.0,
        4.0,
        Rigidbody2D::new(1.0).with_velocity(Vec2::new(3000.0, 0.0)),
    );
    let wall = square(&mut sim, "wall", EntityKind::Environment, 200.0, 300.0, 4.0, Rigidbody2D::kinematic());

    let mut contacts = 0;
    for _ in 0..4 {
        let events = sim.step().unwrap();
        contacts += events
            .iter()
            .filter(|event| matches!(event, CollisionEvent::Contact { .. }))
            .count();
        assert!(position(&sim, bullet).x + 2.0 <= 198.01);
    }

    assert_eq!(contacts, 1);
    assert!(sim.world.get_component::<Rigidbody2D>(bullet).unwrap().velocity.x < 0.0);
    assert_relative_eq!(position(&sim, wall), Vec2::new(200.0, 300.0));
}

#[test]
fn resting_overlap_leaves_small_gap() {
    let mut sim = sim_with(SimulationConfig::default());
    let left = square(&mut sim, "left", EntityKind::Enemy, 300.0, 300.0, 20.0, Rigidbody2D::new(1.0));
    let right = square(&mut sim, "right", EntityKind::Enemy, 316.0, 300.0, 20.0, Rigidbody2D::new(1.0));

    sim.step().unwrap();

    let gap = (position(&sim, right).x - 10.0) - (position(&sim, left).x + 10.0);
    assert_relative_eq!(gap, 0.001, epsilon = 1e-4);
    // Each side moved half of the 4 unit overlap
    assert_relative_eq!(position(&sim, left).x, 298.0, epsilon = 1e-3);
    assert_relative_eq!(position(&sim, right).x, 318.0, epsilon = 1e-3);
}

#[test]
fn kinematic_bodies_ignore_forces_gravity_and_contacts() {
    let mut sim = sim_with(SimulationConfig::default());
    let mut platform_body = Rigidbody2D::kinematic().with_gravity();
    PhysicsSystem::add_force(&mut platform_body, Vec2::new(50.0, -20.0));
    let platform = square(&mut sim, "platform", EntityKind::Environment, 400.0, 400.0, 40.0, platform_body);
    let crate_body = Rigidbody2D::new(2.0).with_velocity(Vec2::new(0.0, 120.0)).with_gravity();
    square(&mut sim, "crate", EntityKind::Prop, 400.0, 340.0, 20.0, crate_body);

    let before = *sim.world.get_component::<Rigidbody2D>(platform).unwrap();
    let mut contacts = 0;
    for _ in 0..120 {
        contacts += sim.step().unwrap().len();
    }

    assert!(contacts > 0);
    assert_relative_eq!(position(&sim, platform), Vec2::new(400.0, 400.0));
    assert_eq!(*sim.world.get_component::<Rigidbody2D>(platform).unwrap(), before);
}

#[test]
fn player_walks_through_left_door() {
    let mut sim = sim_with(SimulationConfig::default());
    let door = sim
        .spawn_body(
            "west door",
            EntityKind::Door(DoorSide::Left),
            Transform2D::new(Vec2::new(10.0, 300.0), Vec2::new(20.0, 80.0)),
            Rigidbody2D::kinematic(),
            true,
        )
        .unwrap();
    let player = square(
        &mut sim,
        "player",
        EntityKind::Player,
        30.0,
        300.0,
        10.0,
        Rigidbody2D::new(1.0).with_velocity(Vec2::new(-120.0, 0.0)),
    );

    let mut entered = Vec::new();
    for _ in 0..5 {
        entered.extend(
            sim.step()
                .unwrap()
                .into_iter()
                .filter(|event| matches!(event, CollisionEvent::DoorEntered { .. })),
        );
    }

    assert_eq!(
        entered,
        vec![CollisionEvent::DoorEntered {
            player,
            door,
            side: DoorSide::Left
        }]
    );
    assert!(position(&sim, player).x > 760.0);
}

#[test]
fn inactive_and_despawned_entities_do_not_collide() {
    let mut sim = sim_with(SimulationConfig::default());
    let a = square(&mut sim, "a", EntityKind::Enemy, 100.0, 100.0, 10.0, Rigidbody2D::new(1.0));
    let b = square(&mut sim, "b", EntityKind::Enemy, 105.0, 100.0, 10.0, Rigidbody2D::new(1.0));
    let c = square(&mut sim, "c", EntityKind::Enemy, 95.0, 100.0, 10.0, Rigidbody2D::new(1.0));

    sim.directory.set_active(b, false);
    sim.despawn(c).unwrap();

    assert!(sim.step().unwrap().is_empty());
    assert_relative_eq!(position(&sim, a).x, 100.0);
    assert_eq!(sim.collision().stats().indexed, 1);
}

struct Counter {
    steps: u32,
    per_frame: Vec<u32>,
}

impl Application for Counter {
    fn initialize(&mut self, sim: &mut Simulation) -> Result<(), AppError> {
        sim.spawn("marker", EntityKind::Environment)?;
        Ok(())
    }

    fn fixed_update(&mut self, _sim: &mut Simulation, _events: &[CollisionEvent], dt: f32) -> Result<(), AppError> {
        assert_relative_eq!(dt, 0.25);
        self.steps += 1;
        Ok(())
    }

    fn frame_end(&mut self, sim: &Simulation) -> Result<(), AppError> {
        self.per_frame.push(sim.frame_controller().steps_this_frame());
        Ok(())
    }
}

#[test]
fn frame_times_release_fixed_steps() {
    let config = SimulationConfig::default()
        .with_fixed_delta_time(0.25)
        .with_max_steps_per_frame(3);
    let mut app = Counter {
        steps: 0,
        per_frame: Vec::new(),
    };

    let sim = Simulation::run(config, &mut app, [0.125, 0.125, 0.5, 2.0, 0.0]).unwrap();

    assert_eq!(app.per_frame, vec![0, 1, 2, 3, 0]);
    assert_eq!(app.steps, 6);
    assert_eq!(sim.frame_controller().total_steps(), 6);
    assert!(sim.frame_controller().dropped_time() > 0.0);
}

#[test]
fn config_file_drives_simulation() {
    let path = std::env::temp_dir().join(format!("kinetic2d_sim_{}.ron", std::process::id()));
    let config = SimulationConfig::default()
        .with_max_entities(2)
        .with_collision(
            CollisionConfig::default()
                .with_world_bounds(Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(320.0, 240.0))),
        );
    config.save_to_file(&path).unwrap();

    let loaded = SimulationConfig::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);

    let mut sim = sim_with(loaded);
    let runner = square(
        &mut sim,
        "runner",
        EntityKind::Enemy,
        310.0,
        120.0,
        10.0,
        Rigidbody2D::new(1.0).with_velocity(Vec2::new(120.0, 0.0)),
    );
    sim.spawn("filler", EntityKind::Environment).unwrap();
    assert!(sim.spawn("overflow", EntityKind::Environment).is_err());

    sim.step().unwrap();
    assert_relative_eq!(position(&sim, runner).x, 315.0);
    assert!(sim.world.get_component::<Rigidbody2D>(runner).unwrap().velocity.x < 0.0);
}
