//! Spatial partitioning
//!
//! Axis-aligned boxes and the quadtree used by the collision broad phase.

pub mod aabb;
pub mod quadtree;

pub use aabb::Aabb;
pub use quadtree::{QuadTree, QuadTreeConfig, QuadTreeNode, QuadTreeObject, MAX_LEVELS, MAX_OBJECTS};
