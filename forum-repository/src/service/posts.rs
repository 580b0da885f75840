//! Post listing and creation.

use forum_shared::{Author, CreatePostRequest, NewPost, Post, PostsPage, VerifiedIdentity};
use tracing::{info, warn};

use super::{required_text, ForumService};
use crate::errors::ForumError;

impl ForumService {
    /// List one page of posts, newest first.
    ///
    /// `limit` defaults to the configured page size and is clamped to
    /// `1..=max_page_size`. Each post's `comments_count` comes from a probe
    /// that fetches at most one comment, so it is 0 or 1 and only tells
    /// whether the post has comments. A failed probe reports 0.
    pub async fn list_posts(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<PostsPage, ForumError> {
        let page_size = self.config.page_size(limit);
        let cursor = cursor.map(str::trim).filter(|c| !c.is_empty());

        let mut page = self
            .retry(|| self.store.query_posts(page_size, cursor))
            .await?;

        for post in page.results.iter_mut() {
            post.comments_count = self.probe_comments(&post.id).await;
        }

        Ok(page)
    }

    async fn probe_comments(&self, post_id: &str) -> u64 {
        match self.retry(|| self.store.query_comments(post_id, 1)).await {
            Ok(comments) => comments.len() as u64,
            Err(error) => {
                warn!(post_id, error = %error, "Comment probe failed, reporting no comments");
                0
            }
        }
    }

    /// Create a post.
    ///
    /// Title and content are trimmed and both required. The author comes from
    /// the verified identity when present, then from the request body, then
    /// the anonymous defaults.
    pub async fn create_post(
        &self,
        request: CreatePostRequest,
        identity: Option<&VerifiedIdentity>,
    ) -> Result<Post, ForumError> {
        let (Some(title), Some(content)) = (
            required_text(request.title.as_deref()),
            required_text(request.content.as_deref()),
        ) else {
            return Err(ForumError::validation("Missing title or content"));
        };

        let new_post = NewPost {
            title,
            content,
            author: Author::resolve(
                identity,
                request.author_name.as_deref(),
                request.author_id.as_deref(),
            ),
        };

        let post = self.retry(|| self.store.create_post(&new_post)).await?;

        info!(post_id = %post.id, author_id = %post.author_id, "Created post");
        Ok(post)
    }
}
