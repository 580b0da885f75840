use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use forum_shared::{Comment, CreateCommentRequest};
use serde::Serialize;

use crate::auth::Caller;
use crate::errors::{ApiError, ApiResult};
use crate::server::extract::JsonBody;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub results: Vec<Comment>,
}

/// `GET /api/posts/:post_id/comments`
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<CommentsResponse>> {
    let results = state
        .service
        .list_comments(&post_id)
        .await
        .map_err(|e| ApiError::from_forum(e, "list_comments", "Failed to fetch comments"))?;

    Ok(Json(CommentsResponse { results }))
}

/// `POST /api/posts/:post_id/comments`
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(post_id): Path<String>,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .service
        .create_comment(&post_id, request, caller.identity())
        .await
        .map_err(|e| ApiError::from_forum(e, "create_comment", "Failed to create comment"))?;

    Ok((StatusCode::CREATED, Json(comment)))
}
