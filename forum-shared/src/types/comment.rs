use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Author;

/// A comment attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    /// Not part of the API payload; comments are always listed per post.
    #[serde(skip)]
    pub post_id: String,
    pub content: String,
    pub author_name: String,
    pub author_id: String,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a comment in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: String,
    pub content: String,
    pub author: Author,
}
