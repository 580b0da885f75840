//! # Forum API
//!
//! HTTP API for the forum. Handlers verify the caller's ID token, delegate to
//! `forum_repository::ForumService` and translate its errors into JSON
//! responses.

pub mod auth;
pub mod config;
pub mod errors;
pub mod server;

pub use auth::{DisabledVerifier, FirebaseVerifier, IdentityVerifier, StaticVerifier};
pub use config::{Dependencies, LogFormat, Settings};
pub use errors::{ApiError, AuthError, ConfigError};
pub use server::state::AppState;
pub use server::{create_app, run_server};
