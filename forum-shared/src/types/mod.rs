mod comment;
mod identity;
mod post;
mod requests;
mod vote;

pub use comment::{Comment, NewComment};
pub use identity::{Author, VerifiedIdentity, ANONYMOUS_ID, ANONYMOUS_NAME};
pub use post::{NewPost, Post, PostsPage};
pub use requests::{CreateCommentRequest, CreatePostRequest};
pub use vote::{UpvoteToggle, VoteRecord, VoteState};
