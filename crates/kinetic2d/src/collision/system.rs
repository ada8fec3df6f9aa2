//! ECS collision system
//!
//! One pass per fixed step:
//! 1. refresh every collider from its transform and clear last step's flags;
//! 2. end weapon swings whose owner left the active frames;
//! 3. rebuild the quadtree from each active entity's swept box;
//! 4. for each unordered candidate pair run the narrow phase and dispatch;
//!    a player takes at most one door per pass;
//! 5. clamp dynamic bodies to the world bounds.

use super::dispatch::{classify, PairResponse, Role};
use super::narrow_phase::{box_box_intersection, Contact, ContactKind};
use super::response::{
    door_response, dynamic_response, knockback_response, static_dynamic_response, static_response,
    world_bounds_response, Body,
};
use crate::config::CollisionConfig;
use crate::ecs::components::{Animation, BoxCollider2D, MeleeWeapon, Rigidbody2D, Transform2D};
use crate::ecs::{EcsResult, Entity, Signature, SystemId, World};
use crate::events::{CollisionEvent, EventQueue};
use crate::scene::{EntityDirectory, EntityKind};
use crate::spatial::{Aabb, QuadTree};
use log::{debug, trace};
use std::collections::HashSet;

/// Counters from the last collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Entities inserted into the quadtree
    pub indexed: usize,
    /// Unordered pairs passed to the narrow phase
    pub pairs_tested: usize,
    /// Pairs that produced a contact
    pub contacts: usize,
}

/// Detects and resolves box collisions between entities with a
/// [`Transform2D`], [`BoxCollider2D`] and [`Rigidbody2D`]
#[derive(Debug)]
pub struct CollisionSystem {
    system: SystemId,
    quadtree: QuadTree,
    config: CollisionConfig,
    stats: CollisionStats,
    // Players moved through a door during the current pass
    door_travellers: HashSet<Entity>,
}

impl CollisionSystem {
    /// Register the system with `world`
    ///
    /// The three component types must already be registered.
    pub fn new(world: &mut World, config: CollisionConfig) -> EcsResult<Self> {
        let signature = Signature::EMPTY
            .with(world.component_type::<Transform2D>()?)
            .with(world.component_type::<BoxCollider2D>()?)
            .with(world.component_type::<Rigidbody2D>()?);
        let system = world.register_system("collision", signature);
        debug!("collision system ready, world bounds {:?}", config.world_bounds);
        Ok(Self {
            system,
            quadtree: QuadTree::new(config.world_bounds, config.quadtree),
            config,
            stats: CollisionStats::default(),
            door_travellers: HashSet::new(),
        })
    }

    /// Handle of the registered system
    pub const fn system_id(&self) -> SystemId {
        self.system
    }

    /// Quadtree built during the last pass
    pub const fn quadtree(&self) -> &QuadTree {
        &self.quadtree
    }

    /// Active configuration
    pub const fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Counters from the last pass
    pub const fn stats(&self) -> CollisionStats {
        self.stats
    }

    /// Run one collision pass over a step of `dt` seconds
    pub fn update(
        &mut self,
        world: &mut World,
        directory: &impl EntityDirectory,
        events: &mut EventQueue,
        dt: f32,
    ) -> EcsResult<CollisionStats> {
        let entities = world.system_entities(self.system);
        self.stats = CollisionStats::default();
        self.door_travellers.clear();

        Self::refresh_colliders(world, &entities)?;
        Self::end_finished_swings(world);

        let active: Vec<Entity> = entities
            .iter()
            .copied()
            .filter(|entity| directory.is_active(*entity))
            .collect();
        self.rebuild_quadtree(world, &active, dt)?;

        for &entity in &active {
            let swept = Self::swept_bounds(world, entity, dt)?;
            for other in self.quadtree.retrieve_unique(&swept) {
                // Each unordered pair once; also skips self-pairs
                if other <= entity || !directory.is_active(other) {
                    continue;
                }
                self.stats.pairs_tested += 1;
                self.test_pair(world, directory, events, entity, other, dt)?;
            }
        }

        if self.config.clamp_to_world_bounds {
            self.clamp_to_world(world, directory, &active)?;
        }

        trace!("collision pass: {:?}", self.stats);
        Ok(self.stats)
    }

    fn refresh_colliders(world: &mut World, entities: &[Entity]) -> EcsResult<()> {
        for &entity in entities {
            let transform = *world.get_component::<Transform2D>(entity)?;
            let collider = world.get_component_mut::<BoxCollider2D>(entity)?;
            collider.update_bounds(&transform);
            collider.reset_step();
        }
        Ok(())
    }

    fn end_finished_swings(world: &mut World) {
        let Ok(weapons) = world.query::<MeleeWeapon>() else {
            return;
        };
        let finished: Vec<Entity> = weapons
            .iter()
            .filter(|(_, weapon)| {
                world
                    .try_component::<Animation>(weapon.owner)
                    .map_or(true, |animation| !weapon.is_active_on(animation.current_frame))
            })
            .map(|(entity, _)| entity)
            .collect();

        for entity in finished {
            if let Some(weapon) = world.try_component_mut::<MeleeWeapon>(entity) {
                weapon.end_swing();
            }
        }
    }

    fn swept_bounds(world: &World, entity: Entity, dt: f32) -> EcsResult<Aabb> {
        let collider = world.get_component::<BoxCollider2D>(entity)?;
        let body = world.get_component::<Rigidbody2D>(entity)?;
        Ok(collider.aabb().swept(body.velocity * dt))
    }

    fn rebuild_quadtree(&mut self, world: &World, active: &[Entity], dt: f32) -> EcsResult<()> {
        self.quadtree.clear();
        for &entity in active {
            self.quadtree.insert(entity, Self::swept_bounds(world, entity, dt)?);
        }
        self.stats.indexed = active.len();
        Ok(())
    }

    fn test_pair(
        &mut self,
        world: &mut World,
        directory: &impl EntityDirectory,
        events: &mut EventQueue,
        entity_a: Entity,
        entity_b: Entity,
        dt: f32,
    ) -> EcsResult<()> {
        let mut a = Body::load(world, entity_a)?;
        let mut b = Body::load(world, entity_b)?;
        // Two solid kinematic bodies have nothing to resolve
        if !a.is_dynamic() && !b.is_dynamic() && !a.collider.is_trigger && !b.collider.is_trigger {
            return Ok(());
        }

        let Some(contact) = box_box_intersection(&a.aabb(), a.rigidbody.velocity, &b.aabb(), b.rigidbody.velocity, dt)
        else {
            return Ok(());
        };
        self.stats.contacts += 1;
        apply_contact(&mut a, &mut b, &contact);

        let response = classify(
            directory.kind(entity_a),
            a.collider.is_trigger,
            directory.kind(entity_b),
            b.collider.is_trigger,
        );
        trace!("{entity_a} x {entity_b}: {response:?} at t={}", contact.time_of_impact);

        match response {
            PairResponse::Physical => {
                if contact.kind == ContactKind::Overlapping {
                    static_response(&mut a, &mut b, self.config.separation_epsilon);
                }
                if a.is_dynamic() && b.is_dynamic() {
                    dynamic_response(&mut a, &mut b, contact.time_of_impact);
                } else {
                    static_dynamic_response(&mut a, &mut b, contact.time_of_impact);
                }
                events.push(CollisionEvent::Contact {
                    a: entity_a,
                    b: entity_b,
                    time_of_impact: contact.time_of_impact,
                    sides_a: contact.flags_a,
                    sides_b: contact.flags_b,
                });
            }
            PairResponse::TriggerOnly { trigger } => {
                let (trigger, other) = by_role(trigger, entity_a, entity_b);
                events.push(CollisionEvent::TriggerEntered { trigger, other });
            }
            PairResponse::Door { player, side } => {
                if self.door_travellers.contains(&by_role(player, entity_a, entity_b).0) {
                    return Ok(());
                }
                let (player_body, door_body, player_entity, door_entity) = match player {
                    Role::A => (&mut a, &b, entity_a, entity_b),
                    Role::B => (&mut b, &a, entity_b, entity_a),
                };
                let bounds = self.config.world_bounds;
                if door_response(player_body, door_body, side, &bounds, self.config.separation_epsilon) {
                    debug!("{player_entity} entered door {door_entity} on {side:?}");
                    self.door_travellers.insert(player_entity);
                    events.push(CollisionEvent::DoorEntered {
                        player: player_entity,
                        door: door_entity,
                        side,
                    });
                }
            }
            PairResponse::MeleeHit { weapon } => {
                let (weapon_entity, target_entity) = by_role(weapon, entity_a, entity_b);
                let (weapon_body, target_body) = match weapon {
                    Role::A => (&a, &mut b),
                    Role::B => (&b, &mut a),
                };
                self.melee_hit(world, events, weapon_entity, weapon_body, target_entity, target_body);
            }
            PairResponse::PropHit { weapon } => {
                let (weapon_entity, prop_entity) = by_role(weapon, entity_a, entity_b);
                Self::prop_hit(world, events, weapon_entity, prop_entity);
            }
        }

        a.collider.reset_contact();
        b.collider.reset_contact();
        a.store(world, entity_a)?;
        b.store(world, entity_b)
    }

    fn melee_hit(
        &self,
        world: &mut World,
        events: &mut EventQueue,
        weapon_entity: Entity,
        weapon_body: &Body,
        target_entity: Entity,
        target_body: &mut Body,
    ) {
        let Some(weapon) = world.try_component::<MeleeWeapon>(weapon_entity) else {
            events.push(CollisionEvent::TriggerEntered {
                trigger: weapon_entity,
                other: target_entity,
            });
            return;
        };
        let attacker = weapon.owner;
        if attacker == target_entity || !owner_on_active_frame(world, weapon) {
            return;
        }

        let damage = weapon.damage;
        let knockback = if weapon.knockback > 0.0 {
            weapon.knockback
        } else {
            self.config.default_knockback
        };

        let registered = world
            .try_component_mut::<MeleeWeapon>(weapon_entity)
            .is_some_and(|weapon| weapon.register_hit(target_entity));
        if !registered {
            return;
        }

        knockback_response(target_body, weapon_body.transform.position, knockback);
        debug!("{attacker} hit {target_entity} for {damage}");
        events.push(CollisionEvent::MeleeHit {
            weapon: weapon_entity,
            attacker,
            target: target_entity,
            damage,
            knockback,
        });
    }

    fn prop_hit(world: &mut World, events: &mut EventQueue, weapon_entity: Entity, prop_entity: Entity) {
        let Some(weapon) = world.try_component::<MeleeWeapon>(weapon_entity) else {
            events.push(CollisionEvent::TriggerEntered {
                trigger: weapon_entity,
                other: prop_entity,
            });
            return;
        };
        if !owner_on_active_frame(world, weapon) {
            return;
        }
        let registered = world
            .try_component_mut::<MeleeWeapon>(weapon_entity)
            .is_some_and(|weapon| weapon.register_hit(prop_entity));
        if !registered {
            return;
        }

        let (frame, destroyed) = match world.try_component_mut::<Animation>(prop_entity) {
            Some(animation) => {
                if animation.current_frame < animation.last_frame() {
                    animation.current_frame += 1;
                }
                (animation.current_frame, animation.current_frame == animation.last_frame())
            }
            None => (0, false),
        };
        events.push(CollisionEvent::PropHit {
            weapon: weapon_entity,
            prop: prop_entity,
            frame,
            destroyed,
        });
    }

    fn clamp_to_world(
        &self,
        world: &mut World,
        directory: &impl EntityDirectory,
        active: &[Entity],
    ) -> EcsResult<()> {
        let bounds = self.config.world_bounds;
        for &entity in active {
            let mut body = Body::load(world, entity)?;
            if !body.is_dynamic() || body.collider.is_trigger {
                continue;
            }
            let bounce = directory.kind(entity) == EntityKind::Enemy;
            if !world_bounds_response(&mut body, &bounds, bounce).is_empty() {
                body.store(world, entity)?;
            }
        }
        Ok(())
    }
}

fn apply_contact(a: &mut Body, b: &mut Body, contact: &Contact) {
    a.collider.mark(contact.flags_a);
    b.collider.mark(contact.flags_b);
    a.collider.overlap = contact.overlap;
    b.collider.overlap = contact.overlap;
}

const fn by_role(role: Role, a: Entity, b: Entity) -> (Entity, Entity) {
    match role {
        Role::A => (a, b),
        Role::B => (b, a),
    }
}

fn owner_on_active_frame(world: &World, weapon: &MeleeWeapon) -> bool {
    world
        .try_component::<Animation>(weapon.owner)
        .is_some_and(|animation| weapon.is_active_on(animation.current_frame))
}
