use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Author;

/// A forum post as returned by the API.
///
/// `upvotes_count` mirrors the denormalized "Upvotes Count" property stored on
/// the post entity. It is maintained by the upvote toggle and is only
/// best-effort consistent with the number of active vote records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub author_id: String,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    pub upvotes_count: u64,
    pub comments_count: u64,
}

/// Fields needed to create a post in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: Author,
}

/// One page of posts, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostsPage {
    pub results: Vec<Post>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl PostsPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}
