//! Upvote toggling and counter maintenance.

use forum_shared::{UpvoteToggle, VerifiedIdentity};
use tracing::{debug, info};

use super::{require_post_id, ForumService};
use crate::config::CounterMode;
use crate::errors::ForumError;

/// Apply a signed delta to a counter, clamping at 0.
pub fn apply_delta(current: u64, delta: i64) -> u64 {
    if delta >= 0 {
        current.saturating_add(delta.unsigned_abs())
    } else {
        current.saturating_sub(delta.unsigned_abs())
    }
}

impl ForumService {
    /// Toggle the caller's upvote on a post.
    ///
    /// Archives the caller's active vote if there is one, otherwise creates a
    /// new vote, then adjusts the post's counter and re-reads the post. The
    /// returned count is whatever the re-read observed, which may include
    /// concurrent writes by other requests.
    ///
    /// The steps are not transactional. If the counter adjustment fails after
    /// the vote was written, the vote change stays and the error is returned.
    ///
    /// # Errors
    ///
    /// * `ForumError::Validation` - `post_id` is blank (no store call is made)
    /// * `ForumError::Unauthorized` - no verified identity (no store call is made)
    /// * `ForumError::Operation` - a store call failed after retries
    pub async fn toggle_upvote(
        &self,
        post_id: &str,
        identity: Option<&VerifiedIdentity>,
    ) -> Result<UpvoteToggle, ForumError> {
        let post_id = require_post_id(post_id)?;
        let user_id = identity
            .map(|identity| identity.uid.trim())
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| ForumError::unauthorized("You must be signed in to upvote"))?;

        let existing = self
            .retry(|| self.store.find_active_votes(post_id, user_id, 1))
            .await?;

        let (upvoted, delta) = match existing.into_iter().next() {
            Some(vote) => {
                self.retry(|| self.store.archive_vote(&vote.id)).await?;
                debug!(post_id, user_id, vote_id = %vote.id, "Archived vote");
                (false, -1)
            }
            None => {
                let vote = self
                    .retry(|| self.store.create_vote(post_id, user_id))
                    .await?;
                debug!(post_id, user_id, vote_id = %vote.id, "Created vote");
                (true, 1)
            }
        };

        self.adjust_upvotes(post_id, delta).await?;

        let post = self.retry(|| self.store.retrieve_post(post_id)).await?;

        info!(
            post_id,
            user_id,
            upvoted,
            upvotes_count = post.upvotes_count,
            "Toggled upvote"
        );

        Ok(UpvoteToggle {
            upvoted,
            upvotes_count: post.upvotes_count,
        })
    }

    /// Add `delta` to a post's upvote counter, never going below 0.
    ///
    /// Reads the current counter and writes back `max(0, current + delta)`.
    /// In `CounterMode::ReadModifyWrite` two concurrent adjustments can both
    /// read the same value and one update is lost. `CounterMode::Serialized`
    /// prevents that for adjustments made through this service instance.
    ///
    /// Returns the value written.
    pub async fn adjust_upvotes(&self, post_id: &str, delta: i64) -> Result<u64, ForumError> {
        let _guard = match self.config.counter_mode {
            CounterMode::Serialized => Some(self.locks.acquire(post_id).await),
            CounterMode::ReadModifyWrite => None,
        };

        let post = self.retry(|| self.store.retrieve_post(post_id)).await?;
        let next = apply_delta(post.upvotes_count, delta);

        self.retry(|| self.store.update_upvotes_count(post_id, next))
            .await?;

        debug!(
            post_id,
            previous = post.upvotes_count,
            next,
            delta,
            "Adjusted upvote counter"
        );
        Ok(next)
    }
}
