//! 2D box collision
//!
//! Broad phase through a per-step quadtree, a swept-AABB narrow phase that
//! yields a time of impact, kind-based pair dispatch and the position and
//! velocity responses.

pub mod dispatch;
pub mod narrow_phase;
pub mod response;
pub mod system;


pub use dispatch::{classify, PairResponse, Role};
pub use narrow_phase::{box_box_intersection, Contact, ContactKind};
pub use response::Body;
pub use system::{CollisionStats, CollisionSystem};
