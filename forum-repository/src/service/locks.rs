//! Per-post async locks used by `CounterMode::Serialized`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per post id.
///
/// Entries nobody holds or waits on are pruned on the next acquisition, so
/// the map only grows with the number of posts being adjusted concurrently.
#[derive(Default)]
pub(crate) struct PostLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PostLocks {
    /// Wait until the lock for `post_id` is free and take it.
    pub(crate) async fn acquire(&self, post_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(post_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
