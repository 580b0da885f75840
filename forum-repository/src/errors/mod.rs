//! Error types for the forum repository.
//!
//! `StoreError` is what providers return; `ForumError` is what the service
//! layer returns to its callers.

mod forum_error;
mod store_error;

pub use forum_error::ForumError;
pub use store_error::StoreError;
