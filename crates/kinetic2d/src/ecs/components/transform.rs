//! Transform component for the ECS system
//!
//! Pure data: world-space position, rotation and scale. Box colliders derive
//! their bounds from `position` and `scale`.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::spatial::Aabb;
use serde::{Deserialize, Serialize};

/// ECS Transform component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// World space position of the center (+y down)
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Full width and height
    pub scale: Vec2,
}

impl Component for Transform2D {}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create from position and size
    pub const fn new(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale,
        }
    }

    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Half of `scale`
    pub fn half_extents(&self) -> Vec2 {
        self.scale * 0.5
    }

    /// Axis-aligned box spanned by this transform
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_from_scale() {
        let transform = Transform2D::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 8.0));
        let bounds = transform.bounds();
        assert_relative_eq!(bounds.min, Vec2::new(8.0, 16.0));
        assert_relative_eq!(bounds.max, Vec2::new(12.0, 24.0));
    }
}
