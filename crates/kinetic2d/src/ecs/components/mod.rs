//! ECS Components module
//!
//! Data components understood by the physics and collision systems.

pub mod animation;
pub mod collider;
pub mod rigidbody;
pub mod transform;
pub mod weapon;

pub use animation::Animation;
pub use collider::{BoxCollider2D, CollisionFlags};
pub use rigidbody::Rigidbody2D;
pub use transform::Transform2D;
pub use weapon::MeleeWeapon;
