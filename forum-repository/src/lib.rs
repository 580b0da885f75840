//! # Forum Repository
//!
//! This crate provides the store interface for the forum, two implementations
//! of it (Notion and in-memory), the retry executor wrapped around every store
//! call, and the `ForumService` that the HTTP layer talks to.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod notion;
pub mod retry;
pub mod service;

pub use config::{CounterMode, ForumServiceConfig};
pub use errors::{ForumError, StoreError};
pub use interfaces::ForumStore;
pub use memory::InMemoryStore;
pub use notion::{NotionConfig, NotionStore};
pub use retry::{backoff_delay, with_retry, RetryClass, RetryPolicy};
pub use service::{apply_delta, ForumService};
