//! Store error types.
//!
//! Every provider reports failures through `StoreError`. Errors that carry an
//! HTTP-style status code are classified by the retry executor.

use thiserror::Error;

/// Errors returned by a `ForumStore` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("Store API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response could not be decoded or was missing required fields.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Create an API error from a status and the store's error payload.
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP-style status code carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
