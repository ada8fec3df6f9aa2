//! ECS error types

use super::Entity;
use thiserror::Error;

/// Structural errors raised by the ECS
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity is dead or was never allocated
    #[error("invalid entity: {0}")]
    InvalidEntity(Entity),

    /// The entity has no component of the requested type
    #[error("{entity} has no {component} component")]
    ComponentMissing {
        /// Entity that was queried
        entity: Entity,
        /// Name of the requested component type
        component: &'static str,
    },

    /// A fixed limit was reached
    #[error("capacity exceeded: at most {limit} {what}")]
    CapacityExceeded {
        /// What ran out
        what: &'static str,
        /// The configured limit
        limit: usize,
    },

    /// The component type was never registered
    #[error("component type not registered: {0}")]
    ComponentNotRegistered(&'static str),
}

/// Convenience result alias for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;
