use thiserror::Error;

use super::Entity;

/// Errors raised by world-level ECS operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),

    #[error("component type {0} cannot be borrowed mutably and immutably at once")]
    AliasedComponent(&'static str),
}
