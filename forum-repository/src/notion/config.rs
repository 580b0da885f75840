//! Connection settings for the Notion provider.

use std::time::Duration;

/// Default Notion API root.
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Default per-request timeout.
pub const DEFAULT_NOTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for `NotionStore`.
///
/// The API key is a server-side secret and must never be sent to clients.
#[derive(Clone)]
pub struct NotionConfig {
    pub api_key: String,
    pub posts_database_id: String,
    pub comments_database_id: String,
    pub upvotes_database_id: String,
    pub base_url: String,
    pub notion_version: String,
    pub timeout: Duration,
}

impl NotionConfig {
    /// Create a config for the public Notion API with default version and timeout.
    pub fn new(
        api_key: impl Into<String>,
        posts_database_id: impl Into<String>,
        comments_database_id: impl Into<String>,
        upvotes_database_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            posts_database_id: posts_database_id.into(),
            comments_database_id: comments_database_id.into(),
            upvotes_database_id: upvotes_database_id.into(),
            base_url: DEFAULT_NOTION_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: DEFAULT_NOTION_TIMEOUT,
        }
    }

    /// Point the provider at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("api_key", &"<redacted>")
            .field("posts_database_id", &self.posts_database_id)
            .field("comments_database_id", &self.comments_database_id)
            .field("upvotes_database_id", &self.upvotes_database_id)
            .field("base_url", &self.base_url)
            .field("notion_version", &self.notion_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
