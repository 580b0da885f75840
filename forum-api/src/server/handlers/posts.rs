use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use forum_shared::{CreatePostRequest, Post, PostsPage};
use serde::Deserialize;

use crate::auth::Caller;
use crate::errors::{ApiError, ApiResult};
use crate::server::extract::JsonBody;
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<String>,
    pub cursor: Option<String>,
}

impl ListPostsQuery {
    /// Non-numeric limits are ignored and the default page size applies.
    fn limit(&self) -> Option<u32> {
        self.limit.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

/// `GET /api/posts?limit&cursor`
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<PostsPage>> {
    state
        .service
        .list_posts(query.limit(), query.cursor.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_forum(e, "list_posts", "Failed to fetch posts"))
}

/// `POST /api/posts`
pub async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = state
        .service
        .create_post(request, caller.identity())
        .await
        .map_err(|e| ApiError::from_forum(e, "create_post", "Failed to create post"))?;

    Ok((StatusCode::CREATED, Json(post)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_parsing_is_lenient() {
        let query = |limit: &str| ListPostsQuery {
            limit: Some(limit.to_string()),
            cursor: None,
        };
        assert_eq!(query("10").limit(), Some(10));
        assert_eq!(query("ten").limit(), None);
        assert_eq!(query("-3").limit(), None);
        assert_eq!(ListPostsQuery::default().limit(), None);
    }
}
