//! Entity-Component-System implementation
//!
//! Entities are plain ids, components live in packed per-type stores, and
//! systems are tracked as sets of entities whose signature matches. All
//! structural changes go through [`World`].

pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod signature;
pub mod storage;
pub mod system;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentManager};
pub use entity::{Entity, EntityManager};
pub use error::{EcsError, EcsResult};
pub use signature::{ComponentType, Signature, MAX_COMPONENTS};
pub use storage::ComponentStore;
pub use system::{SystemId, SystemManager};
pub use world::World;

/// Entity limit used when none is configured
pub const DEFAULT_MAX_ENTITIES: usize = 4096;
