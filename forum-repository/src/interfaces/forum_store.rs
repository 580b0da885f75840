//! Forum store trait definition.
//!
//! This module defines the abstract interface to the document store that
//! holds posts, comments and vote records.

use async_trait::async_trait;
use forum_shared::{Comment, NewComment, NewPost, Post, PostsPage, VoteRecord};

use crate::errors::StoreError;

/// Abstracts the document store backing the forum (Notion, in-memory, ...).
///
/// Implementations are injected into `ForumService`. Every method is a single
/// remote call from the service's point of view; the service wraps each call
/// in the retry executor, so implementations must not retry on their own.
///
/// None of these operations are transactional. In particular there is no
/// atomic increment: the upvote counter is maintained with a separate read
/// (`retrieve_post`) and write (`update_upvotes_count`).
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Query one page of posts, newest first.
    ///
    /// `comments_count` on the returned posts is always 0; the service fills
    /// it in.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Maximum number of posts to return
    /// * `cursor` - Opaque cursor returned by a previous page
    async fn query_posts(
        &self,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<PostsPage, StoreError>;

    /// Create a post with an upvote counter of 0.
    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Retrieve a post by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Post)` - The post, including its current upvote counter
    /// * `Err(StoreError::NotFound)` - If the post does not exist
    async fn retrieve_post(&self, post_id: &str) -> Result<Post, StoreError>;

    /// Overwrite the post's upvote counter.
    async fn update_upvotes_count(&self, post_id: &str, count: u64) -> Result<(), StoreError>;

    /// Query the comments of a post, oldest first, returning at most `page_size`.
    async fn query_comments(
        &self,
        post_id: &str,
        page_size: u32,
    ) -> Result<Vec<Comment>, StoreError>;

    /// Create a comment related to a post.
    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError>;

    /// Find active vote records for `(post_id, user_id)`, returning at most `limit`.
    ///
    /// Archived records never match.
    async fn find_active_votes(
        &self,
        post_id: &str,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<VoteRecord>, StoreError>;

    /// Create an active vote record.
    async fn create_vote(&self, post_id: &str, user_id: &str) -> Result<VoteRecord, StoreError>;

    /// Archive (soft-delete) a vote record.
    ///
    /// Archiving an already archived record succeeds.
    async fn archive_vote(&self, vote_id: &str) -> Result<(), StoreError>;
}
