use serde::{Deserialize, Serialize};

/// Lifecycle state of a vote record.
///
/// Votes are never physically deleted: removing an upvote archives the
/// record. Archived records are terminal and a later upvote creates a new
/// record instead of reactivating the old one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteState {
    Active,
    Archived,
}

/// A single user's upvote on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRecord {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub state: VoteState,
}

impl VoteRecord {
    pub fn is_active(&self) -> bool {
        self.state == VoteState::Active
    }
}

/// Outcome of toggling an upvote.
///
/// `upvotes_count` is the counter value re-read from the store after the
/// toggle, which may already include writes from concurrent requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpvoteToggle {
    pub upvoted: bool,
    pub upvotes_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upvote_toggle_wire_format() {
        let toggle = UpvoteToggle {
            upvoted: true,
            upvotes_count: 7,
        };
        assert_eq!(
            serde_json::to_value(toggle).unwrap(),
            json!({ "upvoted": true, "upvotesCount": 7 })
        );
    }

    #[test]
    fn test_archived_vote_is_not_active() {
        let vote = VoteRecord {
            id: "v1".to_string(),
            post_id: "p1".to_string(),
            user_id: "u1".to_string(),
            state: VoteState::Archived,
        };
        assert!(!vote.is_active());
    }
}
