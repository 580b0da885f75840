//! Notion implementation of the forum store.
//!
//! This module provides a concrete implementation of `ForumStore` using the
//! Notion REST API as the backend.

mod config;
pub mod properties;
mod store;

pub use config::{NotionConfig, DEFAULT_NOTION_BASE_URL, DEFAULT_NOTION_TIMEOUT, DEFAULT_NOTION_VERSION};
pub use store::NotionStore;
