//! Interface definitions for the forum store.
//!
//! This module defines the abstract `ForumStore` trait that allows for
//! dependency injection and swappable persistence backends.

mod forum_store;

pub use forum_store::ForumStore;
