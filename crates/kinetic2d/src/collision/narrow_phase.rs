//! Box-box narrow phase
//!
//! Two cases:
//! - boxes already overlapping (touching counts) resolve along the axis of
//!   least penetration with a time of impact of zero;
//! - separated boxes run a per-axis slab test on the relative velocity and
//!   report the first time of contact inside the step.
//!
//! The overlap case ignores velocity entirely, so a pair that is already
//! touching is pushed apart along the shallowest axis even when the bodies
//! are moving apart.

use crate::ecs::components::CollisionFlags;
use crate::foundation::math::Vec2;
use crate::spatial::Aabb;

/// How the contact was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// The boxes intersected at the start of the step
    Overlapping,
    /// The boxes meet during the step
    Swept,
}

/// Result of a successful box-box test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Overlap or swept contact
    pub kind: ContactKind,
    /// Time within the step at which the boxes meet, in seconds
    pub time_of_impact: f32,
    /// Sides of box A that were hit
    pub flags_a: CollisionFlags,
    /// Sides of box B that were hit
    pub flags_b: CollisionFlags,
    /// Penetration depth along the contact axis; zero for swept contacts
    pub overlap: f32,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Which face of box A is struck on the binding axis
#[derive(Debug, Clone, Copy)]
enum Face {
    /// `max` face of A (RIGHT or BOTTOM)
    Max,
    /// `min` face of A (LEFT or TOP)
    Min,
}

/// Test two moving boxes over a step of length `dt`
///
/// Returns `None` when the boxes neither overlap now nor meet within `dt`.
pub fn box_box_intersection(a: &Aabb, velocity_a: Vec2, b: &Aabb, velocity_b: Vec2, dt: f32) -> Option<Contact> {
    if overlapping(a, b) {
        return Some(overlap_contact(a, b));
    }
    swept_contact(a, b, velocity_b - velocity_a, dt)
}

/// Closed-interval overlap test on both axes
pub fn overlapping(a: &Aabb, b: &Aabb) -> bool {
    !(a.max.x < b.min.x || b.max.x < a.min.x || a.max.y < b.min.y || b.max.y < a.min.y)
}

fn overlap_contact(a: &Aabb, b: &Aabb) -> Contact {
    // Each candidate: depth, sides of A, sides of B
    let candidates = [
        (b.max.x - a.min.x, CollisionFlags::LEFT, CollisionFlags::RIGHT),
        (a.max.x - b.min.x, CollisionFlags::RIGHT, CollisionFlags::LEFT),
        (b.max.y - a.min.y, CollisionFlags::TOP, CollisionFlags::BOTTOM),
        (a.max.y - b.min.y, CollisionFlags::BOTTOM, CollisionFlags::TOP),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }

    Contact {
        kind: ContactKind::Overlapping,
        time_of_impact: 0.0,
        flags_a: best.1,
        flags_b: best.2,
        overlap: best.0,
    }
}

fn swept_contact(a: &Aabb, b: &Aabb, relative_velocity: Vec2, dt: f32) -> Option<Contact> {
    let mut t_first = 0.0_f32;
    let mut t_last = dt;
    let mut binding: Option<(Axis, Face)> = None;

    for axis in [Axis::X, Axis::Y] {
        let (a_min, a_max, b_min, b_max, v) = match axis {
            Axis::X => (a.min.x, a.max.x, b.min.x, b.max.x, relative_velocity.x),
            Axis::Y => (a.min.y, a.max.y, b.min.y, b.max.y, relative_velocity.y),
        };

        if v < 0.0 {
            // B travels toward -axis relative to A
            if b_max < a_min {
                return None;
            }
            if a_max < b_min {
                let entry = (a_max - b_min) / v;
                if entry > t_first {
                    t_first = entry;
                    binding = Some((axis, Face::Max));
                }
            }
            if b_max > a_min {
                t_last = t_last.min((a_min - b_max) / v);
            }
        } else if v > 0.0 {
            if a_max < b_min {
                return None;
            }
            if b_max < a_min {
                let entry = (a_min - b_max) / v;
                if entry > t_first {
                    t_first = entry;
                    binding = Some((axis, Face::Min));
                }
            }
            if b_min < a_max {
                t_last = t_last.min((a_max - b_min) / v);
            }
        } else if a_max < b_min || b_max < a_min {
            return None;
        }

        if t_first > t_last {
            return None;
        }
    }

    let (flags_a, flags_b) = match binding? {
        (Axis::X, Face::Max) => (CollisionFlags::RIGHT, CollisionFlags::LEFT),
        (Axis::X, Face::Min) => (CollisionFlags::LEFT, CollisionFlags::RIGHT),
        (Axis::Y, Face::Max) => (CollisionFlags::BOTTOM, CollisionFlags::TOP),
        (Axis::Y, Face::Min) => (CollisionFlags::TOP, CollisionFlags::BOTTOM),
    };

    Some(Contact {
        kind: ContactKind::Swept,
        time_of_impact: t_first,
        flags_a,
        flags_b,
        overlap: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn aabb(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Aabb {
        Aabb::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    #[test]
    fn test_swept_separation_stays_apart() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(20.0, 0.0, 30.0, 10.0);
        assert!(box_box_intersection(&a, Vec2::new(5.0, 0.0), &b, Vec2::zeros(), 1.0).is_none());
    }

    #[test]
    fn test_swept_contact_timing() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(20.0, 0.0, 30.0, 10.0);
        let contact = box_box_intersection(&a, Vec2::new(15.0, 0.0), &b, Vec2::zeros(), 1.0).unwrap();

        assert_eq!(contact.kind, ContactKind::Swept);
        assert_relative_eq!(contact.time_of_impact, 10.0 / 15.0, epsilon = 1e-3);
        assert_eq!(contact.flags_a, CollisionFlags::RIGHT);
        assert_eq!(contact.flags_b, CollisionFlags::LEFT);
    }

    #[test]
    fn test_swept_contact_from_other_side() {
        // B moves left into A from the right: same sides as above
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(20.0, 0.0, 30.0, 10.0);
        let contact = box_box_intersection(&a, Vec2::zeros(), &b, Vec2::new(-20.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(contact.time_of_impact, 0.5, epsilon = 1e-5);
        assert_eq!(contact.flags_a, CollisionFlags::RIGHT);

        // A falls onto B below it (+y is down)
        let floor = aabb(0.0, 20.0, 10.0, 30.0);
        let contact = box_box_intersection(&a, Vec2::new(0.0, 40.0), &floor, Vec2::zeros(), 1.0).unwrap();
        assert_relative_eq!(contact.time_of_impact, 0.25, epsilon = 1e-5);
        assert_eq!(contact.flags_a, CollisionFlags::BOTTOM);
        assert_eq!(contact.flags_b, CollisionFlags::TOP);
    }

    #[test]
    fn test_moving_away_or_parallel_misses() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(20.0, 0.0, 30.0, 10.0);
        assert!(box_box_intersection(&a, Vec2::new(-5.0, 0.0), &b, Vec2::zeros(), 1.0).is_none());

        // Disjoint on y with no relative y motion never meets
        let c = aabb(20.0, 50.0, 30.0, 60.0);
        assert!(box_box_intersection(&a, Vec2::new(100.0, 0.0), &c, Vec2::zeros(), 1.0).is_none());
    }

    #[test]
    fn test_contact_after_step_is_ignored() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(20.0, 0.0, 30.0, 10.0);
        assert!(box_box_intersection(&a, Vec2::new(15.0, 0.0), &b, Vec2::zeros(), 0.5).is_none());
    }

    #[test]
    fn test_overlap_picks_shallowest_axis() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(8.0, 1.0, 18.0, 11.0);
        let contact = box_box_intersection(&a, Vec2::zeros(), &b, Vec2::zeros(), 1.0).unwrap();

        assert_eq!(contact.kind, ContactKind::Overlapping);
        assert_relative_eq!(contact.time_of_impact, 0.0);
        assert_relative_eq!(contact.overlap, 2.0);
        assert_eq!(contact.flags_a, CollisionFlags::RIGHT);
        assert_eq!(contact.flags_b, CollisionFlags::LEFT);
    }

    #[test]
    fn test_overlap_on_vertical_axis() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let above = aabb(2.0, -9.0, 8.0, 1.0);
        let contact = box_box_intersection(&a, Vec2::zeros(), &above, Vec2::zeros(), 1.0).unwrap();
        assert_relative_eq!(contact.overlap, 1.0);
        assert_eq!(contact.flags_a, CollisionFlags::TOP);
        assert_eq!(contact.flags_b, CollisionFlags::BOTTOM);
    }

    #[test]
    fn test_touching_counts_as_overlap() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(10.0, 0.0, 20.0, 10.0);
        let contact = box_box_intersection(&a, Vec2::new(-3.0, 0.0), &b, Vec2::zeros(), 1.0).unwrap();
        assert_eq!(contact.kind, ContactKind::Overlapping);
        assert_relative_eq!(contact.overlap, 0.0);
    }
}
