//! Scene bookkeeping
//!
//! Maps entities to gameplay identity: a name, a closed [`EntityKind`] used
//! for collision dispatch, and an active flag.

pub mod directory;

pub use directory::{DoorSide, EntityDirectory, EntityKind, GameObject, GameObjectDirectory};
