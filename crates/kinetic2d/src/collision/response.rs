//! Collision response
//!
//! Responses operate on [`Body`] snapshots so a pair can be resolved without
//! holding two mutable borrows into the world. Kinematic bodies are never
//! moved and never have their velocity changed.

use crate::ecs::components::{BoxCollider2D, CollisionFlags, Rigidbody2D, Transform2D};
use crate::ecs::{EcsResult, Entity, World};
use crate::foundation::math::Vec2;
use crate::scene::DoorSide;
use crate::spatial::Aabb;

/// Copy of the three components the collision pass works on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Transform snapshot
    pub transform: Transform2D,
    /// Collider snapshot
    pub collider: BoxCollider2D,
    /// Rigid body snapshot
    pub rigidbody: Rigidbody2D,
}

impl Body {
    /// Build a body and refresh the collider bounds from the transform
    pub fn new(transform: Transform2D, collider: BoxCollider2D, rigidbody: Rigidbody2D) -> Self {
        let mut body = Self {
            transform,
            collider,
            rigidbody,
        };
        body.collider.update_bounds(&body.transform);
        body
    }

    /// Read the body of `entity` from the world
    pub fn load(world: &World, entity: Entity) -> EcsResult<Self> {
        Ok(Self::new(
            *world.get_component::<Transform2D>(entity)?,
            *world.get_component::<BoxCollider2D>(entity)?,
            *world.get_component::<Rigidbody2D>(entity)?,
        ))
    }

    /// Write the body of `entity` back to the world
    pub fn store(&self, world: &mut World, entity: Entity) -> EcsResult<()> {
        *world.get_component_mut::<Transform2D>(entity)? = self.transform;
        *world.get_component_mut::<BoxCollider2D>(entity)? = self.collider;
        *world.get_component_mut::<Rigidbody2D>(entity)? = self.rigidbody;
        Ok(())
    }

    /// Current collider bounds
    pub const fn aabb(&self) -> Aabb {
        self.collider.aabb()
    }

    /// Dynamic bodies can be moved by responses
    pub const fn is_dynamic(&self) -> bool {
        !self.rigidbody.is_kinematic
    }

    /// Move the body and keep its rigid body and collider in step
    pub fn translate(&mut self, offset: Vec2) {
        self.set_position(self.transform.position + offset);
    }

    /// Place the body and keep its rigid body and collider in step
    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
        self.rigidbody.position = position;
        self.collider.update_bounds(&self.transform);
    }
}

/// Unit direction that moves A away from B for the given sides of A
fn away_from_contact(flags_a: CollisionFlags) -> Vec2 {
    if flags_a.contains(CollisionFlags::LEFT) {
        Vec2::new(1.0, 0.0)
    } else if flags_a.contains(CollisionFlags::RIGHT) {
        Vec2::new(-1.0, 0.0)
    } else if flags_a.contains(CollisionFlags::TOP) {
        Vec2::new(0.0, 1.0)
    } else if flags_a.contains(CollisionFlags::BOTTOM) {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::zeros()
    }
}

/// Push two overlapping boxes apart by the recorded overlap plus `epsilon`
///
/// The push is split evenly when both bodies are dynamic; otherwise the
/// dynamic one moves the full distance.
pub fn static_response(a: &mut Body, b: &mut Body, epsilon: f32) {
    let (share_a, share_b) = match (a.is_dynamic(), b.is_dynamic()) {
        (true, true) => (0.5, 0.5),
        (true, false) => (1.0, 0.0),
        (false, true) => (0.0, 1.0),
        (false, false) => return,
    };

    let direction = away_from_contact(a.collider.collision_flag);
    let distance = a.collider.overlap.max(b.collider.overlap) + epsilon;

    if share_a > 0.0 {
        a.translate(direction * distance * share_a);
    }
    if share_b > 0.0 {
        b.translate(-direction * distance * share_b);
    }
}

/// Resolve a contact where exactly one body is kinematic
///
/// The dynamic body advances to the time of impact and its velocity is
/// reflected away from the contact on the struck axis.
pub fn static_dynamic_response(a: &mut Body, b: &mut Body, time_of_impact: f32) {
    for body in [&mut *a, &mut *b] {
        if body.is_dynamic() {
            let displacement = body.rigidbody.velocity * time_of_impact;
            body.translate(displacement);
        }
    }

    let flags = a.collider.collision_flag;
    if flags.contains(CollisionFlags::RIGHT) {
        reflect_x(a, -1.0);
        reflect_x(b, 1.0);
    } else if flags.contains(CollisionFlags::LEFT) {
        reflect_x(a, 1.0);
        reflect_x(b, -1.0);
    } else if flags.contains(CollisionFlags::TOP) {
        reflect_y(a, 1.0);
        reflect_y(b, -1.0);
    } else if flags.contains(CollisionFlags::BOTTOM) {
        reflect_y(a, -1.0);
        reflect_y(b, 1.0);
    }
}

/// Resolve a contact between two dynamic bodies
///
/// Both bodies advance to the time of impact and stop moving into each other
/// on the struck axis; motion away from the contact is kept.
pub fn dynamic_response(a: &mut Body, b: &mut Body, time_of_impact: f32) {
    for body in [&mut *a, &mut *b] {
        if body.is_dynamic() {
            let displacement = body.rigidbody.velocity * time_of_impact;
            body.translate(displacement);
        }
    }

    let flags = a.collider.collision_flag;
    if flags.contains(CollisionFlags::RIGHT) {
        stop_x(a, |vx| vx > 0.0);
        stop_x(b, |vx| vx < 0.0);
    } else if flags.contains(CollisionFlags::LEFT) {
        stop_x(a, |vx| vx < 0.0);
        stop_x(b, |vx| vx > 0.0);
    } else if flags.contains(CollisionFlags::TOP) {
        stop_y(a, |vy| vy < 0.0);
        stop_y(b, |vy| vy > 0.0);
    } else if flags.contains(CollisionFlags::BOTTOM) {
        stop_y(a, |vy| vy > 0.0);
        stop_y(b, |vy| vy < 0.0);
    }
}

fn reflect_x(body: &mut Body, sign: f32) {
    if body.is_dynamic() {
        body.rigidbody.velocity.x = body.rigidbody.velocity.x.abs() * sign;
    }
}

fn reflect_y(body: &mut Body, sign: f32) {
    if body.is_dynamic() {
        body.rigidbody.velocity.y = body.rigidbody.velocity.y.abs() * sign;
    }
}

fn stop_x(body: &mut Body, approaching: impl Fn(f32) -> bool) {
    if body.is_dynamic() && approaching(body.rigidbody.velocity.x) {
        body.rigidbody.velocity.x = 0.0;
    }
}

fn stop_y(body: &mut Body, approaching: impl Fn(f32) -> bool) {
    if body.is_dynamic() && approaching(body.rigidbody.velocity.y) {
        body.rigidbody.velocity.y = 0.0;
    }
}

/// Move a player through a door
///
/// Contacts on the door's wall-side faces push the player out like a wall
/// and return `false`. Otherwise the player is placed `epsilon` clear of a
/// door-sized strip along the opposite edge of `world_bounds` and `true` is
/// returned.
pub fn door_response(player: &mut Body, door: &Body, side: DoorSide, world_bounds: &Aabb, epsilon: f32) -> bool {
    if !player.is_dynamic() {
        return false;
    }

    let door_flags = door.collider.collision_flag;
    let half = player.transform.half_extents();
    let door_box = door.aabb();
    let door_size = door.transform.scale;
    let mut position = player.transform.position;

    let entered = match side {
        DoorSide::Left | DoorSide::Right => {
            if door_flags.contains(CollisionFlags::TOP) {
                position.y = door_box.min.y - half.y - epsilon;
                false
            } else if door_flags.contains(CollisionFlags::BOTTOM) {
                position.y = door_box.max.y + half.y + epsilon;
                false
            } else {
                position.x = if side == DoorSide::Left {
                    world_bounds.max.x - door_size.x - half.x - epsilon
                } else {
                    world_bounds.min.x + door_size.x + half.x + epsilon
                };
                true
            }
        }
        DoorSide::Top | DoorSide::Bottom => {
            if door_flags.contains(CollisionFlags::LEFT) {
                position.x = door_box.min.x - half.x - epsilon;
                false
            } else if door_flags.contains(CollisionFlags::RIGHT) {
                position.x = door_box.max.x + half.x + epsilon;
                false
            } else {
                position.y = if side == DoorSide::Top {
                    world_bounds.max.y - door_size.y - half.y - epsilon
                } else {
                    world_bounds.min.y + door_size.y + half.y + epsilon
                };
                true
            }
        }
    };

    player.set_position(position);
    entered
}

/// Set a knockback velocity on `target` pointing away from `source`
pub fn knockback_response(target: &mut Body, source: Vec2, strength: f32) {
    if !target.is_dynamic() {
        return;
    }
    let direction = (target.transform.position - source)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(|| Vec2::new(1.0, 0.0));
    target.rigidbody.velocity = direction * strength;
}

/// Keep a dynamic body inside `bounds`
///
/// Returns the walls that were hit. With `bounce` set the velocity is
/// reflected on the clamped axis.
pub fn world_bounds_response(body: &mut Body, bounds: &Aabb, bounce: bool) -> CollisionFlags {
    if !body.is_dynamic() {
        return CollisionFlags::empty();
    }

    let half = body.transform.half_extents();
    let mut position = body.transform.position;
    let mut hit = CollisionFlags::empty();

    if position.x - half.x < bounds.min.x {
        position.x = bounds.min.x + half.x;
        hit |= CollisionFlags::LEFT;
    } else if position.x + half.x > bounds.max.x {
        position.x = bounds.max.x - half.x;
        hit |= CollisionFlags::RIGHT;
    }
    if position.y - half.y < bounds.min.y {
        position.y = bounds.min.y + half.y;
        hit |= CollisionFlags::TOP;
    } else if position.y + half.y > bounds.max.y {
        position.y = bounds.max.y - half.y;
        hit |= CollisionFlags::BOTTOM;
    }

    if hit.is_empty() {
        return hit;
    }

    body.set_position(position);
    body.collider.touching |= hit;

    if bounce {
        if hit.contains(CollisionFlags::LEFT) {
            reflect_x(body, 1.0);
        } else if hit.contains(CollisionFlags::RIGHT) {
            reflect_x(body, -1.0);
        }
        if hit.contains(CollisionFlags::TOP) {
            reflect_y(body, 1.0);
        } else if hit.contains(CollisionFlags::BOTTOM) {
            reflect_y(body, -1.0);
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::narrow_phase::box_box_intersection;
    use approx::assert_relative_eq;

    fn body(center: Vec2, size: Vec2, rigidbody: Rigidbody2D) -> Body {
        let transform = Transform2D::new(center, size);
        Body::new(transform, BoxCollider2D::from_transform(&transform), rigidbody)
    }

    fn square(center_x: f32, center_y: f32, rigidbody: Rigidbody2D) -> Body {
        body(Vec2::new(center_x, center_y), Vec2::new(10.0, 10.0), rigidbody)
    }

    fn mark(a: &mut Body, b: &mut Body, dt: f32) -> f32 {
        let contact = box_box_intersection(
            &a.aabb(),
            a.rigidbody.velocity,
            &b.aabb(),
            b.rigidbody.velocity,
            dt,
        )
        .unwrap();
        a.collider.mark(contact.flags_a);
        b.collider.mark(contact.flags_b);
        a.collider.overlap = contact.overlap;
        b.collider.overlap = contact.overlap;
        contact.time_of_impact
    }

    #[test]
    fn test_static_response_splits_between_dynamic_bodies() {
        // A spans 0..10, B spans 8..18 on x
        let mut a = square(5.0, 5.0, Rigidbody2D::new(1.0));
        let mut b = square(13.0, 5.0, Rigidbody2D::new(1.0));
        mark(&mut a, &mut b, 1.0);

        static_response(&mut a, &mut b, 0.001);

        let gap = b.aabb().min.x - a.aabb().max.x;
        assert_relative_eq!(gap, 0.001, epsilon = 1e-4);
        assert_relative_eq!(a.transform.position.x, 5.0 - 1.0005, epsilon = 1e-4);
        assert_relative_eq!(b.transform.position.x, 13.0 + 1.0005, epsilon = 1e-4);
        assert_relative_eq!(a.transform.position.y, 5.0);
    }

    #[test]
    fn test_static_response_moves_only_dynamic_body() {
        let mut wall = square(5.0, 5.0, Rigidbody2D::kinematic());
        let mut mover = square(5.0, 13.0, Rigidbody2D::new(1.0));
        mark(&mut wall, &mut mover, 1.0);
        assert_eq!(wall.collider.collision_flag, CollisionFlags::BOTTOM);

        let wall_before = wall;
        static_response(&mut wall, &mut mover, 0.001);

        assert_eq!(wall, wall_before);
        assert_relative_eq!(mover.aabb().min.y - wall.aabb().max.y, 0.001, epsilon = 1e-4);
    }

    #[test]
    fn test_static_dynamic_reflects_velocity() {
        let mut ball = square(5.0, 5.0, Rigidbody2D::new(1.0).with_velocity(Vec2::new(15.0, 3.0)));
        let mut wall = square(25.0, 5.0, Rigidbody2D::kinematic());
        let toi = mark(&mut ball, &mut wall, 1.0);

        let wall_before = wall;
        static_dynamic_response(&mut ball, &mut wall, toi);

        assert_relative_eq!(ball.aabb().max.x, wall.aabb().min.x, epsilon = 1e-3);
        assert_relative_eq!(ball.rigidbody.velocity.x, -15.0);
        assert_relative_eq!(ball.rigidbody.velocity.y, 3.0);
        assert_eq!(wall, wall_before);
    }

    #[test]
    fn test_dynamic_response_stops_approach() {
        let mut a = square(5.0, 5.0, Rigidbody2D::new(1.0).with_velocity(Vec2::new(10.0, 0.0)));
        let mut b = square(25.0, 5.0, Rigidbody2D::new(1.0).with_velocity(Vec2::new(-10.0, 2.0)));
        let toi = mark(&mut a, &mut b, 1.0);
        assert_relative_eq!(toi, 0.5, epsilon = 1e-5);

        dynamic_response(&mut a, &mut b, toi);

        assert_relative_eq!(a.transform.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(b.transform.position.x, 20.0, epsilon = 1e-4);
        assert_relative_eq!(a.rigidbody.velocity.x, 0.0);
        assert_relative_eq!(b.rigidbody.velocity.x, 0.0);
        assert_relative_eq!(b.rigidbody.velocity.y, 2.0);
    }

    #[test]
    fn test_door_moves_player_to_opposite_edge() {
        let bounds = Aabb::new(Vec2::zeros(), Vec2::new(800.0, 600.0));
        let mut door = body(Vec2::new(10.0, 300.0), Vec2::new(20.0, 80.0), Rigidbody2D::kinematic());
        let mut player = square(24.0, 300.0, Rigidbody2D::new(1.0).with_velocity(Vec2::new(-50.0, 0.0)));
        mark(&mut player, &mut door, 1.0 / 60.0);
        assert_eq!(door.collider.collision_flag, CollisionFlags::RIGHT);

        assert!(door_response(&mut player, &door, DoorSide::Left, &bounds, 0.001));
        assert_relative_eq!(player.transform.position.x, 800.0 - 20.0 - 5.0 - 0.001, epsilon = 1e-4);
        assert_relative_eq!(player.transform.position.y, 300.0);
    }

    #[test]
    fn test_door_edge_acts_as_wall() {
        let bounds = Aabb::new(Vec2::zeros(), Vec2::new(800.0, 600.0));
        let mut door = body(Vec2::new(10.0, 300.0), Vec2::new(20.0, 80.0), Rigidbody2D::kinematic());
        // Player sits just above the door, overlapping its top face by 1
        let mut player = square(10.0, 256.0, Rigidbody2D::new(1.0));
        mark(&mut player, &mut door, 1.0 / 60.0);
        assert_eq!(door.collider.collision_flag, CollisionFlags::TOP);

        assert!(!door_response(&mut player, &door, DoorSide::Left, &bounds, 0.001));
        assert_relative_eq!(player.aabb().max.y, 260.0 - 0.001, epsilon = 1e-4);
    }

    #[test]
    fn test_knockback_points_away_from_source() {
        let mut target = square(10.0, 0.0, Rigidbody2D::new(1.0));
        knockback_response(&mut target, Vec2::zeros(), 100.0);
        assert_relative_eq!(target.rigidbody.velocity, Vec2::new(100.0, 0.0));

        let mut statue = square(10.0, 0.0, Rigidbody2D::kinematic());
        knockback_response(&mut statue, Vec2::zeros(), 100.0);
        assert_relative_eq!(statue.rigidbody.velocity, Vec2::zeros());
    }

    #[test]
    fn test_world_bounds_clamp_and_bounce() {
        let bounds = Aabb::new(Vec2::zeros(), Vec2::new(100.0, 100.0));
        let mut enemy = square(98.0, 50.0, Rigidbody2D::new(1.0).with_velocity(Vec2::new(20.0, -4.0)));

        let hit = world_bounds_response(&mut enemy, &bounds, true);

        assert_eq!(hit, CollisionFlags::RIGHT);
        assert_relative_eq!(enemy.transform.position.x, 95.0);
        assert_relative_eq!(enemy.rigidbody.velocity.x, -20.0);
        assert_relative_eq!(enemy.rigidbody.velocity.y, -4.0);

        let mut inside = square(50.0, 50.0, Rigidbody2D::new(1.0));
        assert!(world_bounds_response(&mut inside, &bounds, true).is_empty());
    }
}
