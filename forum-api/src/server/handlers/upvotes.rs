use axum::extract::{Path, State};
use axum::{Extension, Json};
use forum_shared::UpvoteToggle;

use crate::auth::Caller;
use crate::errors::{ApiError, ApiResult};
use crate::server::state::AppState;

/// `POST /api/posts/:post_id/upvote`
///
/// Requires a verified caller. Responds with the new vote state and the
/// counter as re-read after the update.
pub async fn toggle_upvote(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<UpvoteToggle>> {
    state
        .service
        .toggle_upvote(&post_id, caller.identity())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_forum(e, "toggle_upvote", "Failed to toggle upvote"))
}
