//! Retry executor for rate-limited store calls.
//!
//! The store enforces a low request rate and answers bursts with 429. Any
//! remote call can be wrapped with [`with_retry`], which retries rate-limit
//! and server errors with jittered exponential backoff and propagates every
//! other failure unchanged.
//!
//! The pieces compose independently of any particular call site:
//! - [`backoff_delay`] is the pure `(attempt, base_delay) -> delay` function
//! - [`RetryClass::of_status`] is the classification predicate
//! - [`BackoffSchedule`] turns a [`RetryPolicy`] into the delays between attempts

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_retry::RetryIf;
use tracing::warn;

use crate::errors::StoreError;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: usize = 4;

/// Default base delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(400);

/// Default upper bound (exclusive) of the random jitter added to each delay.
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(100);

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. `0` disables retrying.
    pub max_retries: usize,
    /// Delay before the first retry; doubled for every further retry.
    pub base_delay: Duration,
    /// Jitter is drawn uniformly from `[0, max_jitter)`.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and base delay and the
    /// default jitter.
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// The delays slept between attempts under this policy.
    pub fn schedule(&self) -> BackoffSchedule {
        BackoffSchedule {
            attempt: 0,
            remaining: self.max_retries,
            base_delay: self.base_delay,
            max_jitter: self.max_jitter,
        }
    }
}

/// Exponential delay before retry number `attempt + 1`: `base_delay * 2^attempt`.
///
/// Saturates instead of overflowing for very large attempts.
pub fn backoff_delay(attempt: u32, base_delay: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base_delay.saturating_mul(factor)
}

/// Iterator over the delays between attempts.
///
/// Yields `policy.max_retries` delays, each `backoff_delay(attempt) + jitter`.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    attempt: u32,
    remaining: usize,
    base_delay: Duration,
    max_jitter: Duration,
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let delay = backoff_delay(self.attempt, self.base_delay) + jitter(self.max_jitter);
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

fn jitter(max_jitter: Duration) -> Duration {
    let max_ms = max_jitter.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
}

/// Whether a failed call may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Rate limited (429) or server error (5xx).
    Retryable,
    /// Anything else; propagated after a single attempt.
    Fatal,
}

impl RetryClass {
    /// Classify an HTTP-style status code. A missing status is fatal.
    pub fn of_status(status: Option<u16>) -> Self {
        match status {
            Some(429) | Some(500..=599) => Self::Retryable,
            _ => Self::Fatal,
        }
    }
}

/// Errors that can be classified by the retry executor.
pub trait Classify {
    fn retry_class(&self) -> RetryClass;
}

impl Classify for StoreError {
    fn retry_class(&self) -> RetryClass {
        RetryClass::of_status(self.status())
    }
}

/// Run `operation`, retrying retryable failures according to `policy`.
///
/// Success on any attempt is returned immediately. A fatal error is returned
/// after the attempt that produced it. When the retry budget is exhausted the
/// last error is returned unchanged. Each invocation keeps its own attempt
/// counter, so the executor can be shared freely.
///
/// # Example
///
/// ```ignore
/// let post = with_retry(&policy, || store.retrieve_post(post_id)).await?;
/// ```
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify + std::fmt::Display,
{
    let mut failures = 0usize;
    let max_retries = policy.max_retries;

    RetryIf::start(policy.schedule(), operation, |error: &E| {
        failures += 1;
        let retryable = error.retry_class() == RetryClass::Retryable;
        if retryable && failures <= max_retries {
            warn!(
                attempt = failures,
                max_retries,
                error = %error,
                "Store call failed with a retryable error, backing off"
            );
        }
        retryable
    })
    .await
}
