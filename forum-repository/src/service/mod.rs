//! Forum service implementation.
//!
//! This module provides the main service for reading and writing forum data.
//! HTTP handlers use it to list and create posts and comments and to toggle
//! upvotes. Every store call made by the service goes through the retry
//! executor.

mod comments;
mod locks;
mod posts;
mod upvotes;

use std::future::Future;
use std::sync::Arc;

use crate::config::ForumServiceConfig;
use crate::errors::{ForumError, StoreError};
use crate::interfaces::ForumStore;
use crate::retry::with_retry;

pub use upvotes::apply_delta;

use locks::PostLocks;

/// The main service for interacting with the forum.
///
/// This is the high-level API the HTTP layer uses. It validates input, resolves
/// authors and delegates to a `ForumStore` for the actual reads and writes.
/// All operations return `ForumError` for consistent error handling.
///
/// The service holds no per-request state and is shared between handlers
/// behind an `Arc`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use forum_repository::{ForumService, InMemoryStore};
/// use forum_shared::VerifiedIdentity;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryStore::new());
/// let post = store.seed_post("Hello", "World", 0).await;
/// let service = ForumService::new(store);
///
/// let identity = VerifiedIdentity::new("user-1");
/// let toggle = service.toggle_upvote(&post.id, Some(&identity)).await?;
/// assert!(toggle.upvoted);
/// # Ok(())
/// # }
/// ```
pub struct ForumService {
    store: Arc<dyn ForumStore>,
    config: ForumServiceConfig,
    locks: PostLocks,
}

impl ForumService {
    /// Create a new ForumService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - The store implementation (e.g., `NotionStore`)
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self::with_config(store, ForumServiceConfig::default())
    }

    /// Create a new ForumService with custom configuration.
    ///
    /// Use this to change the retry policy or the counter mode.
    pub fn with_config(store: Arc<dyn ForumStore>, config: ForumServiceConfig) -> Self {
        Self {
            store,
            config,
            locks: PostLocks::default(),
        }
    }

    pub fn config(&self) -> &ForumServiceConfig {
        &self.config
    }

    /// Run one store call through the retry executor.
    async fn retry<T, F, Fut>(&self, operation: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        with_retry(&self.config.retry, operation).await
    }
}

/// Validate a post id taken from the request path.
fn require_post_id(post_id: &str) -> Result<&str, ForumError> {
    let post_id = post_id.trim();
    if post_id.is_empty() {
        return Err(ForumError::validation("Missing postId"));
    }
    Ok(post_id)
}

/// Trim a required text field, treating blank values as missing.
fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
