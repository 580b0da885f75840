//! Request bodies accepted by the forum API.
//!
//! Every field is optional at the deserialization level so that missing
//! fields surface as validation errors from the service rather than as JSON
//! decoding failures.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_id: Option<String>,
}

/// Body of `POST /api/posts/{postId}/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_id: Option<String>,
}
