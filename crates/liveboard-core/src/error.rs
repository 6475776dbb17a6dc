//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A mutation targeted an entity that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up (`message`, `task`).
        entity: &'static str,
        /// The identifier that was not found.
        id: Uuid,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a missing message.
    #[must_use]
    pub fn message_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: "message",
            id,
        }
    }

    /// Shorthand for a missing task.
    #[must_use]
    pub fn task_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "task", id }
    }
}
