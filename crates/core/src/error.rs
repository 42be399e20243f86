//! Domain errors shared across the workspace.
//!
//! Variants carry enough structure for the HTTP layer to classify them
//! without parsing message strings.

use crate::types::{DbId, Timestamp};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A review workflow step that the state machine does not permit.
    #[error("Cannot move review from '{from}' to '{to}'")]
    IllegalTransition { from: String, to: String },

    /// Login refused because the account is locked after repeated failures.
    #[error("Account is locked until {until}")]
    LockedOut { until: Timestamp },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
