//! Entity lifecycle and signature consistency
//!
//! Drives the world through random structural edits and checks after every
//! edit that signatures, stores and system memberships agree.

use crate::ecs::components::{BoxCollider2D, Rigidbody2D, Transform2D};
use crate::ecs::{Component, ComponentType, Entity, Signature, SystemId, World};
use crate::foundation::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn registered_world() -> (World, [ComponentType; 3]) {
    let mut world = World::new(64);
    let types = [
        world.register_component::<Transform2D>().unwrap(),
        world.register_component::<Rigidbody2D>().unwrap(),
        world.register_component::<BoxCollider2D>().unwrap(),
    ];
    (world, types)
}

fn assert_consistent(world: &World, types: &[ComponentType; 3], systems: &[(SystemId, Signature)]) {
    for entity in world.entities() {
        let signature = world.signature(entity).unwrap();
        for component_type in types {
            assert_eq!(
                world.components().contains(entity, *component_type),
                signature.contains(*component_type),
                "store and signature disagree for {entity}"
            );
        }
        for (id, required) in systems {
            let member = world.systems().entities(*id).unwrap().contains(&entity);
            assert_eq!(member, signature.matches(*required), "{entity} membership is stale");
        }
    }
    for (id, _) in systems {
        for member in world.systems().entities(*id).unwrap() {
            assert!(world.is_alive(*member), "dead {member} still in a system");
        }
    }
}

fn toggle<T: Component>(world: &mut World, entity: Entity, value: T) {
    if world.has_component::<T>(entity) {
        world.remove_component::<T>(entity).unwrap();
    } else {
        world.add_component(entity, value).unwrap();
    }
}

#[test]
fn test_signature_matches_stores_under_random_edits() {
    let (mut world, types) = registered_world();
    let physics_sig = Signature::EMPTY.with(types[0]).with(types[1]);
    let collision_sig = physics_sig.with(types[2]);
    let systems = [
        (world.register_system("physics", physics_sig), physics_sig),
        (world.register_system("collision", collision_sig), collision_sig),
    ];

    let mut rng = StdRng::seed_from_u64(42);
    let mut living: Vec<Entity> = Vec::new();

    for _ in 0..2000 {
        match rng.gen_range(0..6) {
            0 if living.len() < 60 => living.push(world.create_entity().unwrap()),
            1 if !living.is_empty() => {
                let entity = living.swap_remove(rng.gen_range(0..living.len()));
                world.destroy_entity(entity).unwrap();
            }
            2 if !living.is_empty() && living.len() < 60 => {
                let source = living[rng.gen_range(0..living.len())];
                living.push(world.clone_entity(source).unwrap());
            }
            3 if !living.is_empty() => {
                let entity = living[rng.gen_range(0..living.len())];
                toggle(&mut world, entity, Transform2D::default());
            }
            4 if !living.is_empty() => {
                let entity = living[rng.gen_range(0..living.len())];
                toggle(&mut world, entity, Rigidbody2D::default());
            }
            5 if !living.is_empty() => {
                let entity = living[rng.gen_range(0..living.len())];
                toggle(&mut world, entity, BoxCollider2D::default());
            }
            _ => {}
        }
        assert_consistent(&world, &types, &systems);
    }
    assert_eq!(world.entity_count(), living.len());
}

#[test]
fn test_recycled_id_has_no_stale_data() {
    let (mut world, _) = registered_world();
    let entity = world.create_entity().unwrap();
    world
        .add_component(entity, Transform2D::from_position(Vec2::new(3.0, 4.0)))
        .unwrap();
    world.add_component(entity, Rigidbody2D::new(2.0)).unwrap();

    world.destroy_entity(entity).unwrap();
    let recycled = world.create_entity().unwrap();

    assert_eq!(recycled, entity);
    assert!(world.signature(recycled).unwrap().is_empty());
    assert!(!world.has_component::<Transform2D>(recycled));
    assert!(world.get_component::<Rigidbody2D>(recycled).is_err());
}
