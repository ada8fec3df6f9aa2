//! Math utilities and types
//!
//! Provides the 2D math types used by the simulation. Coordinates are in
//! screen space: +x points right and +y points down.

pub use nalgebra::{Point2 as NPoint2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = NPoint2<f32>;

/// Unit vector pointing along +x
pub fn unit_x() -> Vec2 {
    Vec2::new(1.0, 0.0)
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.max(min).min(max)
    }

    /// Linear interpolation between two values
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Snap a value to zero when its magnitude is below `epsilon`
    pub fn snap_to_zero(value: f32, epsilon: f32) -> f32 {
        if value.abs() < epsilon {
            0.0
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_snap_to_zero() {
        assert_relative_eq!(utils::snap_to_zero(0.005, 0.01), 0.0);
        assert_relative_eq!(utils::snap_to_zero(-0.005, 0.01), 0.0);
        assert_relative_eq!(utils::snap_to_zero(0.5, 0.01), 0.5);
    }

    #[test]
    fn test_lerp_and_clamp() {
        assert_relative_eq!(utils::lerp(0.0, 10.0, 0.25), 2.5);
        assert_relative_eq!(utils::clamp(12.0, 0.0, 10.0), 10.0);
        assert_relative_eq!(unit_x().x, 1.0);
    }
}
