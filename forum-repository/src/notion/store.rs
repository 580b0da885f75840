//! Notion provider implementation.
//!
//! This module provides the concrete implementation of `ForumStore` on top of
//! the Notion REST API. Posts, comments and upvotes live in three databases;
//! every record is a page whose properties follow the schema in
//! [`properties`](super::properties).

use async_trait::async_trait;
use forum_shared::{Comment, NewComment, NewPost, Post, PostsPage, VoteRecord};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::interfaces::ForumStore;
use crate::notion::config::NotionConfig;
use crate::notion::properties;

/// Error payload returned by the Notion API.
#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    code: String,
    message: String,
}

/// Response of `POST /databases/{id}/query`.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

/// Notion-backed forum store.
///
/// The provider performs exactly one HTTP request per trait method and never
/// retries; rate limiting (429) and server errors are surfaced as
/// `StoreError::Api` for the retry executor to classify.
///
/// # Example
///
/// ```ignore
/// use forum_repository::notion::{NotionConfig, NotionStore};
///
/// let config = NotionConfig::new(api_key, posts_db, comments_db, upvotes_db);
/// let store = NotionStore::new(config)?;
/// let post = store.retrieve_post("0f9b...").await?;
/// ```
pub struct NotionStore {
    client: Client,
    config: NotionConfig,
}

impl NotionStore {
    /// Create a provider with an HTTP client carrying the auth and version headers.
    ///
    /// # Returns
    ///
    /// * `Ok(NotionStore)` - A new provider instance
    /// * `Err(StoreError::Transport)` - If the headers are invalid or the client cannot be built
    pub fn new(config: NotionConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| StoreError::transport("Notion API key is not a valid header value"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&config.notion_version)
            .map_err(|_| StoreError::transport("Notion version is not a valid header value"))?;
        headers.insert("Notion-Version", version);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        info!(
            base_url = %config.base_url,
            notion_version = %config.notion_version,
            "Created Notion store"
        );

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Path of a page, rejecting ids that could escape the `pages/` segment.
    fn page_path(page_id: &str) -> Result<String, StoreError> {
        if page_id.is_empty() || !page_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(StoreError::not_found(format!("invalid page id '{}'", page_id)));
        }
        Ok(format!("pages/{}", page_id))
    }

    /// Send a request and decode the JSON body, turning non-success statuses
    /// into `StoreError::Api`.
    async fn send(&self, request: RequestBuilder, operation: &'static str) -> Result<Value, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| StoreError::decode(format!("{}: {}", operation, e)));
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<NotionErrorBody>(&body) {
            Ok(error) => (error.code, error.message),
            Err(_) => ("unknown".to_string(), body),
        };

        debug!(
            operation,
            status = status.as_u16(),
            code = %code,
            message = %message,
            "Notion request failed"
        );
        Err(StoreError::api(status.as_u16(), code, message))
    }

    async fn query_database(&self, database_id: &str, body: Value) -> Result<QueryResponse, StoreError> {
        let request = self
            .client
            .post(self.url(&format!("databases/{}/query", database_id)))
            .json(&body);
        let value = self.send(request, "query_database").await?;
        serde_json::from_value(value)
            .map_err(|e| StoreError::decode(format!("query_database: {}", e)))
    }

    async fn create_page(&self, database_id: &str, properties: Value) -> Result<Value, StoreError> {
        let request = self.client.post(self.url("pages")).json(&json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        }));
        self.send(request, "create_page").await
    }

    async fn update_page(&self, page_id: &str, body: Value) -> Result<Value, StoreError> {
        let request = self
            .client
            .patch(self.url(&Self::page_path(page_id)?))
            .json(&body);
        self.send(request, "update_page").await
    }
}

#[async_trait]
impl ForumStore for NotionStore {
    async fn query_posts(&self, page_size: u32, cursor: Option<&str>) -> Result<PostsPage, StoreError> {
        let mut body = Map::new();
        body.insert("page_size".to_string(), json!(page_size));
        body.insert(
            "sorts".to_string(),
            json!([{ "timestamp": "created_time", "direction": "descending" }]),
        );
        if let Some(cursor) = cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }

        let response = self
            .query_database(&self.config.posts_database_id, Value::Object(body))
            .await?;

        let results = response
            .results
            .iter()
            .map(properties::post_from_page)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PostsPage {
            results,
            next_cursor: response.next_cursor.filter(|_| response.has_more),
            has_more: response.has_more,
        })
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let page = self
            .create_page(&self.config.posts_database_id, properties::post_properties(post))
            .await?;
        properties::post_from_page(&page)
    }

    async fn retrieve_post(&self, post_id: &str) -> Result<Post, StoreError> {
        let request = self.client.get(self.url(&Self::page_path(post_id)?));
        let page = self.send(request, "retrieve_page").await?;
        properties::post_from_page(&page)
    }

    async fn update_upvotes_count(&self, post_id: &str, count: u64) -> Result<(), StoreError> {
        let mut props = Map::new();
        props.insert(properties::UPVOTES_COUNT.to_string(), properties::number(count));
        self.update_page(post_id, json!({ "properties": props })).await?;
        Ok(())
    }

    async fn query_comments(&self, post_id: &str, page_size: u32) -> Result<Vec<Comment>, StoreError> {
        let body = json!({
            "filter": { "property": properties::POST, "relation": { "contains": post_id } },
            "sorts": [{ "timestamp": "created_time", "direction": "ascending" }],
            "page_size": page_size,
        });
        let response = self
            .query_database(&self.config.comments_database_id, body)
            .await?;

        response
            .results
            .iter()
            .map(|page| properties::comment_from_page(page, post_id))
            .collect()
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let page = self
            .create_page(
                &self.config.comments_database_id,
                properties::comment_properties(comment),
            )
            .await?;
        properties::comment_from_page(&page, &comment.post_id)
    }

    async fn find_active_votes(
        &self,
        post_id: &str,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<VoteRecord>, StoreError> {
        // Database queries never return archived pages.
        let body = json!({
            "filter": {
                "and": [
                    { "property": properties::USER_ID, "rich_text": { "equals": user_id } },
                    { "property": properties::POST, "relation": { "contains": post_id } }
                ]
            },
            "page_size": limit,
        });
        let response = self
            .query_database(&self.config.upvotes_database_id, body)
            .await?;

        let votes = response
            .results
            .iter()
            .map(|page| properties::vote_from_page(page, post_id, user_id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(votes.into_iter().filter(VoteRecord::is_active).collect())
    }

    async fn create_vote(&self, post_id: &str, user_id: &str) -> Result<VoteRecord, StoreError> {
        let page = self
            .create_page(
                &self.config.upvotes_database_id,
                properties::vote_properties(post_id, user_id),
            )
            .await?;
        properties::vote_from_page(&page, post_id, user_id)
    }

    async fn archive_vote(&self, vote_id: &str) -> Result<(), StoreError> {
        self.update_page(vote_id, json!({ "archived": true })).await?;
        Ok(())
    }
}
