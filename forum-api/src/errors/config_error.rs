//! Configuration errors.

use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set to a value that cannot be used.
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            value: value.into(),
        }
    }
}
