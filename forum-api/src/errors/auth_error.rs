//! Identity verification errors.

use thiserror::Error;

/// Errors that can occur while verifying an ID token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The token is malformed, expired, signed by an unknown key or issued
    /// for another project.
    #[error("Invalid ID token: {0}")]
    Invalid(String),

    /// The signing keys could not be fetched.
    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// No identity provider is configured.
    #[error("Identity verification is not configured")]
    NotConfigured,
}

impl AuthError {
    /// Create an invalid token error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create a key fetch error.
    pub fn key_fetch(msg: impl Into<String>) -> Self {
        Self::KeyFetch(msg.into())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::KeyFetch(err.to_string())
    }
}
