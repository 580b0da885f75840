//! In-memory forum store for local development and testing.
//!
//! The `InMemoryStore` keeps posts, comments and vote records in process
//! memory, allowing the API to run without Notion credentials.
//!
//! # Example
//!
//! ```ignore
//! use forum_repository::{ForumStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let post = store.seed_post("Hello", "First post", 3).await;
//! let page = store.query_posts(20, None).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use forum_shared::{
    Author, Comment, NewComment, NewPost, Post, PostsPage, VoteRecord, VoteState,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::interfaces::ForumStore;

#[derive(Default)]
struct Tables {
    /// Posts in creation order.
    posts: Vec<Post>,
    comments: Vec<Comment>,
    /// Vote records keyed by id, archived ones included.
    votes: HashMap<String, VoteRecord>,
}

/// Forum store that keeps every record in memory.
///
/// Archived votes are kept so tests can inspect the full history of a
/// `(post, user)` pair. Cursors are decimal offsets into the newest-first
/// post list.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post with a preset upvote counter.
    pub async fn seed_post(&self, title: &str, content: &str, upvotes_count: u64) -> Post {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author_name: forum_shared::ANONYMOUS_NAME.to_string(),
            author_id: forum_shared::ANONYMOUS_ID.to_string(),
            created_at: Utc::now(),
            upvotes_count,
            comments_count: 0,
        };
        self.tables.write().await.posts.push(post.clone());
        post
    }

    /// All vote records of a post, archived ones included.
    pub async fn votes_for(&self, post_id: &str) -> Vec<VoteRecord> {
        self.tables
            .read()
            .await
            .votes
            .values()
            .filter(|vote| vote.post_id == post_id)
            .cloned()
            .collect()
    }

    /// Current counter of a post, if it exists.
    pub async fn upvotes_of(&self, post_id: &str) -> Option<u64> {
        self.tables
            .read()
            .await
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| post.upvotes_count)
    }

    fn parse_cursor(cursor: Option<&str>) -> Result<usize, StoreError> {
        match cursor {
            None => Ok(0),
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                StoreError::api(400, "validation_error", format!("invalid start_cursor '{}'", raw))
            }),
        }
    }
}

fn post_not_found(post_id: &str) -> StoreError {
    StoreError::not_found(format!("post '{}'", post_id))
}

#[async_trait]
impl ForumStore for InMemoryStore {
    async fn query_posts(&self, page_size: u32, cursor: Option<&str>) -> Result<PostsPage, StoreError> {
        let offset = Self::parse_cursor(cursor)?;
        let tables = self.tables.read().await;
        let total = tables.posts.len();

        let results: Vec<Post> = tables
            .posts
            .iter()
            .rev()
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect();

        let consumed = offset + results.len();
        let has_more = consumed < total;

        Ok(PostsPage {
            results,
            next_cursor: has_more.then(|| consumed.to_string()),
            has_more,
        })
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let NewPost { title, content, author: Author { name, id } } = post;
        let created = Post {
            id: Uuid::new_v4().to_string(),
            title: title.clone(),
            content: content.clone(),
            author_name: name.clone(),
            author_id: id.clone(),
            created_at: Utc::now(),
            upvotes_count: 0,
            comments_count: 0,
        };
        self.tables.write().await.posts.push(created.clone());
        Ok(created)
    }

    async fn retrieve_post(&self, post_id: &str) -> Result<Post, StoreError> {
        self.tables
            .read()
            .await
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .cloned()
            .ok_or_else(|| post_not_found(post_id))
    }

    async fn update_upvotes_count(&self, post_id: &str, count: u64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| post_not_found(post_id))?;
        post.upvotes_count = count;
        Ok(())
    }

    async fn query_comments(&self, post_id: &str, page_size: u32) -> Result<Vec<Comment>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|post| post.id == comment.post_id) {
            return Err(post_not_found(&comment.post_id));
        }

        let created = Comment {
            id: Uuid::new_v4().to_string(),
            post_id: comment.post_id.clone(),
            content: comment.content.clone(),
            author_name: comment.author.name.clone(),
            author_id: comment.author.id.clone(),
            created_at: Utc::now(),
        };
        tables.comments.push(created.clone());
        Ok(created)
    }

    async fn find_active_votes(
        &self,
        post_id: &str,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .votes
            .values()
            .filter(|vote| vote.is_active() && vote.post_id == post_id && vote.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_vote(&self, post_id: &str, user_id: &str) -> Result<VoteRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|post| post.id == post_id) {
            return Err(post_not_found(post_id));
        }

        let vote = VoteRecord {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            state: VoteState::Active,
        };
        tables.votes.insert(vote.id.clone(), vote.clone());
        Ok(vote)
    }

    async fn archive_vote(&self, vote_id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let vote = tables
            .votes
            .get_mut(vote_id)
            .ok_or_else(|| StoreError::not_found(format!("vote '{}'", vote_id)))?;
        vote.state = VoteState::Archived;
        Ok(())
    }
}
