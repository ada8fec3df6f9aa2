//! Axis-aligned bounding boxes

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box in world space
///
/// Intervals are closed: boxes that share an edge intersect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (left, top)
    pub min: Vec2,
    /// Maximum corner (right, bottom)
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Create an AABB from a center and a full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_center_extents(center, size * 0.5)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Width along x
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height along y
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if `other` lies entirely inside this AABB
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Check if this AABB intersects another AABB (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Copy of this box moved by `offset`
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Smallest box containing both boxes
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    /// Box covering this box before and after moving by `displacement`
    #[must_use]
    pub fn swept(&self, displacement: Vec2) -> Self {
        self.union(&self.translated(displacement))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec2::zeros(), Vec2::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_touching_boxes_intersect() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let c = Aabb::new(Vec2::new(10.5, 0.0), Vec2::new(20.0, 10.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_swept_covers_path() {
        let a = Aabb::from_center_size(Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0));
        let swept = a.swept(Vec2::new(-10.0, 3.0));
        assert_relative_eq!(swept.min.x, -6.0);
        assert_relative_eq!(swept.max.x, 6.0);
        assert_relative_eq!(swept.min.y, 4.0);
        assert_relative_eq!(swept.max.y, 9.0);
    }

    #[test]
    fn test_contains() {
        let outer = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let inner = Aabb::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let straddling = Aabb::new(Vec2::new(90.0, 90.0), Vec2::new(110.0, 95.0));
        assert!(outer.contains(&inner));
        assert!(!outer.contains(&straddling));
        assert!(outer.intersects(&straddling));
    }
}
