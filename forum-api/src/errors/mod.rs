//! Error types for the forum API.

mod api_error;
mod auth_error;
mod config_error;

pub use api_error::{ApiError, ApiResult, ErrorResponse};
pub use auth_error::AuthError;
pub use config_error::ConfigError;
