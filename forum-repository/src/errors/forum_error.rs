//! Service-level error types.

use thiserror::Error;

use crate::errors::StoreError;

/// Errors returned by `ForumService` operations.
///
/// `Validation` and `Unauthorized` are detected locally before the store is
/// touched. `Operation` wraps any store failure that survived the retry
/// executor; callers should log it and answer with a generic message.
#[derive(Debug, Clone, Error)]
pub enum ForumError {
    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller has no verified identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A store call failed.
    #[error("Operation failed: {0}")]
    Operation(#[from] StoreError),
}

impl ForumError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authorization error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}
