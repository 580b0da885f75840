//! # Forum Shared
//!
//! This crate defines the data structures shared by the forum repository and
//! the HTTP API: posts, comments, upvote records, verified identities and the
//! request bodies accepted by the API.

pub mod types;

pub use types::{
    Author, Comment, CreateCommentRequest, CreatePostRequest, NewComment, NewPost, Post,
    PostsPage, UpvoteToggle, VerifiedIdentity, VoteRecord, VoteState, ANONYMOUS_ID,
    ANONYMOUS_NAME,
};
