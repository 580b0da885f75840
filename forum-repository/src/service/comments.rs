//! Comment listing and creation.

use forum_shared::{Author, Comment, CreateCommentRequest, NewComment, VerifiedIdentity};
use tracing::info;

use super::{require_post_id, required_text, ForumService};
use crate::errors::ForumError;

impl ForumService {
    /// Comments of a post, oldest first, up to `max_page_size`.
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ForumError> {
        let post_id = require_post_id(post_id)?;
        let page_size = self.config.max_page_size;

        Ok(self
            .retry(|| self.store.query_comments(post_id, page_size))
            .await?)
    }

    /// Add a comment to a post.
    ///
    /// Author resolution follows `create_post`.
    pub async fn create_comment(
        &self,
        post_id: &str,
        request: CreateCommentRequest,
        identity: Option<&VerifiedIdentity>,
    ) -> Result<Comment, ForumError> {
        let post_id = require_post_id(post_id)?;
        let content = required_text(request.content.as_deref())
            .ok_or_else(|| ForumError::validation("Missing content"))?;

        let new_comment = NewComment {
            post_id: post_id.to_string(),
            content,
            author: Author::resolve(
                identity,
                request.author_name.as_deref(),
                request.author_id.as_deref(),
            ),
        };

        let comment = self
            .retry(|| self.store.create_comment(&new_comment))
            .await?;

        info!(post_id, comment_id = %comment.id, "Created comment");
        Ok(comment)
    }
}
