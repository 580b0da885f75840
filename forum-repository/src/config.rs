//! Configuration types for the ForumService.

use crate::retry::RetryPolicy;

/// Default number of posts per page when the caller does not ask for one.
pub const DEFAULT_POSTS_PAGE_SIZE: u32 = 20;

/// Largest page the store accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How the denormalized upvote counter is adjusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CounterMode {
    /// Read the counter, compute `max(0, current + delta)`, write it back.
    ///
    /// Concurrent toggles on the same post can interleave between the read and
    /// the write and lose updates. This matches the store's capabilities (no
    /// atomic increment) and is the default.
    #[default]
    ReadModifyWrite,

    /// Same read-modify-write, but adjustments for the same post are
    /// serialized through an in-process lock.
    ///
    /// Closes the lost-update window between requests served by this process
    /// only; separate processes still race.
    Serialized,
}

impl CounterMode {
    /// Parse a mode name as used in configuration.
    ///
    /// Accepts `read-modify-write` (also `rmw`) and `serialized`, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "read-modify-write" | "read_modify_write" | "rmw" => Some(Self::ReadModifyWrite),
            "serialized" | "serialised" => Some(Self::Serialized),
            _ => None,
        }
    }
}

/// Configuration for the ForumService.
#[derive(Debug, Clone)]
pub struct ForumServiceConfig {
    /// Retry policy applied to every store call.
    pub retry: RetryPolicy,
    /// Upvote counter adjustment strategy.
    pub counter_mode: CounterMode,
    /// Page size used by `list_posts` when none is requested.
    pub default_page_size: u32,
    /// Upper bound for any page size.
    pub max_page_size: u32,
}

impl Default for ForumServiceConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            counter_mode: CounterMode::default(),
            default_page_size: DEFAULT_POSTS_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ForumServiceConfig {
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_counter_mode(mut self, counter_mode: CounterMode) -> Self {
        self.counter_mode = counter_mode;
        self
    }

    /// Resolve the effective page size for a request.
    ///
    /// Missing limits use the default; everything is clamped to `1..=max_page_size`.
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}
