//! Error kinds reported by queue operations.

use thiserror::Error;

use crate::EntryId;

/// Errors returned to callers of the queue contract.
///
/// None of these leave a partial effect behind: a failed operation did not
/// change the queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Caller input violates a precondition.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Removal target does not exist.
    #[error("entry not found: {0}")]
    NotFound(String),

    /// Credential or session token missing, malformed, invalid or expired.
    #[error("unauthorized")]
    Unauthorized,

    /// Backing store unreachable or the store actor is gone.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl QueueError {
    pub fn not_found(id: EntryId) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Short machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            QueueError::Validation(_) => "validation_error",
            QueueError::NotFound(_) => "not_found",
            QueueError::Unauthorized => "unauthorized",
            QueueError::StoreUnavailable(_) => "store_unavailable",
            QueueError::Internal(_) => "internal_error",
        }
    }
}
