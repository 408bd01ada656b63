//! In-memory tile store using moka.
//!
//! Useful for development and tests, or as a volatile cache in front of
//! nothing at all. Entries are weighted by payload size and evicted LRU
//! when the configured limit is exceeded.

use bytes::Bytes;
use moka::future::Cache as MokaCache;

use crate::cache::traits::{BoxFuture, StoreError, TileStore};

/// In-memory tile store with automatic LRU eviction.
pub struct MemoryTileStore {
    cache: MokaCache<String, Bytes>,
    max_size_bytes: u64,
}

impl MemoryTileStore {
    /// Create a new memory store.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Maximum total payload size kept in memory
    pub fn new(max_size_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            // Weight each entry by its payload size
            .weigher(|_key: &String, value: &Bytes| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self {
            cache,
            max_size_bytes,
        }
    }

    /// Approximate number of stored tiles.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Approximate total payload size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}

impl TileStore for MemoryTileStore {
    fn exists(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.contains_key(&key)) })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn put(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> BoxFuture<'_, Result<String, StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let location = format!("memory://{}", key);
            self.cache.insert(key, data).await;
            Ok(location)
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
