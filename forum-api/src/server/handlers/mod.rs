//! HTTP request handlers.

mod auth;
mod comments;
mod posts;
mod upvotes;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub use auth::verify_token;
pub use comments::{create_comment, list_comments};
pub use posts::{create_post, list_posts};
pub use upvotes::toggle_upvote;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
