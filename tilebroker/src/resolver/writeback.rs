//! Detached cache writeback.
//!
//! After an origin fetch the resolver hands the payload to the
//! [`WritebackQueue`] and returns immediately. Each writeback runs as its own
//! task; failures are logged and counted, never surfaced to the request that
//! triggered them.
//!
//! Tasks are tracked so shutdown can wait for pending writes instead of
//! dropping them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, TileStore, TILE_CONTENT_TYPE};

/// Default number of writebacks allowed to run against the store at once.
pub const DEFAULT_MAX_CONCURRENT_WRITEBACKS: usize = 32;

/// Counters for writeback outcomes.
#[derive(Debug, Default)]
struct WritebackCounters {
    scheduled: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of the writeback counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritebackStats {
    pub scheduled: u64,
    pub completed: u64,
    pub failed: u64,
}

impl WritebackStats {
    /// Writebacks scheduled but not yet finished.
    pub fn pending(&self) -> u64 {
        self.scheduled
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

/// Spawns and tracks background cache writes.
///
/// Clones share the same tracker, limit and counters.
#[derive(Clone)]
pub struct WritebackQueue {
    store: Arc<dyn TileStore>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    counters: Arc<WritebackCounters>,
}

impl WritebackQueue {
    /// Create a queue writing to `store` with at most `max_concurrent`
    /// writes in flight. Further writebacks wait for a permit.
    pub fn new(store: Arc<dyn TileStore>, max_concurrent: usize) -> Self {
        Self {
            store,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tracker: TaskTracker::new(),
            counters: Arc::new(WritebackCounters::default()),
        }
    }

    /// Schedule a write of `data` under `key` and return at once.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, key: CacheKey, data: Bytes) {
        self.counters.scheduled.fetch_add(1, Ordering::Relaxed);

        let store = Arc::clone(&self.store);
        let permits = Arc::clone(&self.permits);
        let counters = Arc::clone(&self.counters);

        self.tracker.spawn(async move {
            // The semaphore is never closed.
            let _permit = permits.acquire_owned().await;

            let bytes = data.len();
            match store.put(key.as_str(), data, TILE_CONTENT_TYPE).await {
                Ok(location) => {
                    counters.completed.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, location = %location, bytes, "Tile written back to cache");
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(key = %key, error = %e, "Cache writeback failed");
                }
            }
        });
    }

    /// Number of writeback tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn stats(&self) -> WritebackStats {
        WritebackStats {
            scheduled: self.counters.scheduled.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Wait for every writeback scheduled so far, up to `timeout`.
    ///
    /// Returns `true` if all pending writes finished in time. The queue stays
    /// usable afterwards.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let pending = self.tracker.len();
        if pending > 0 {
            info!(pending, "Draining cache writebacks");
        }

        self.tracker.close();
        let finished = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();

        if !finished {
            warn!(
                remaining = self.tracker.len(),
                timeout_ms = timeout.as_millis() as u64,
                "Writeback drain timed out"
            );
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{BoxFuture, MemoryTileStore, StoreError};
    use crate::coord::{ProviderId, ThemeMode, TileCoordinate, TileRequest};

    fn key(x: &str) -> CacheKey {
        CacheKey::for_request(&TileRequest::new(
            ProviderId::new("maptiler"),
            ThemeMode::Dark,
            TileCoordinate::new(x, "2", "5").unwrap(),
        ))
    }

    struct FailingStore;

    impl TileStore for FailingStore {
        fn exists(&self, _key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
            Box::pin(async { Ok(false) })
        }

        fn get(&self, _key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>> {
            Box::pin(async { Ok(None) })
        }

        fn put(
            &self,
            _key: &str,
            _data: Bytes,
            _content_type: &str,
        ) -> BoxFuture<'_, Result<String, StoreError>> {
            Box::pin(async { Err(StoreError::Backend("read-only".to_string())) })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_schedule_writes_to_store() {
        let store = Arc::new(MemoryTileStore::new(1024 * 1024));
        let queue = WritebackQueue::new(store.clone(), 4);

        queue.schedule(key("3"), Bytes::from_static(b"png"));
        assert!(queue.drain(Duration::from_secs(5)).await);

        assert_eq!(
            store.get("maptiler/0/5/3/2.png").await.unwrap(),
            Some(Bytes::from_static(b"png"))
        );
        let stats = queue.stats();
        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let queue = WritebackQueue::new(Arc::new(FailingStore), 4);

        queue.schedule(key("3"), Bytes::from_static(b"png"));
        queue.schedule(key("4"), Bytes::from_static(b"png"));
        assert!(queue.drain(Duration::from_secs(5)).await);

        let stats = queue.stats();
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.completed, 0);
    }

    #[tokio::test]
    async fn test_queue_usable_after_drain() {
        let store = Arc::new(MemoryTileStore::new(1024 * 1024));
        let queue = WritebackQueue::new(store.clone(), 1);

        queue.schedule(key("1"), Bytes::from_static(b"a"));
        assert!(queue.drain(Duration::from_secs(5)).await);
        queue.schedule(key("2"), Bytes::from_static(b"b"));
        assert!(queue.drain(Duration::from_secs(5)).await);

        assert_eq!(queue.stats().completed, 2);
        assert_eq!(queue.in_flight(), 0);
        assert!(store.exists("maptiler/0/5/2/2.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_limit_serialises_writes() {
        let store = Arc::new(MemoryTileStore::new(1024 * 1024));
        let queue = WritebackQueue::new(store, 1);

        for x in 0..10 {
            queue.schedule(key(&x.to_string()), Bytes::from_static(b"t"));
        }
        assert!(queue.drain(Duration::from_secs(5)).await);
        assert_eq!(queue.stats().completed, 10);
    }

    #[tokio::test]
    async fn test_drain_with_nothing_pending() {
        let queue = WritebackQueue::new(Arc::new(MemoryTileStore::new(1024)), 1);
        assert!(queue.drain(Duration::from_millis(10)).await);
    }
}
