//! Cache-aside tile resolution.
//!
//! ```text
//! request ──► policy check ──► registry lookup ──► exists(key)?
//!                                                      │
//!                 ┌──────────── yes ───────────────────┴── no ──┐
//!                 ▼                                             ▼
//!             get(key)                                build origin URL
//!                 │                     credential guard
//!                 │                     origin GET
//!                 │                     schedule writeback
//!                 ▼                               ▼
//!             payload ◄───────────────────── payload
//! ```
//!
//! The writeback is detached: the caller gets the origin payload before the
//! store write completes. Concurrent misses for the same tile each fetch
//! from the origin and each schedule a writeback; the last write wins.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, StoreError, TileStore};
use crate::coord::{CoordinatePolicy, TileRequest};
use crate::provider::{
    has_blank_credential, origin_url, strip_query, AsyncHttpClient, ProviderDescriptor,
    ProviderRegistry,
};

use super::types::{ResolveError, ResolvedTile, TileSource};
use super::writeback::{WritebackQueue, DEFAULT_MAX_CONCURRENT_WRITEBACKS};

/// Resolves tile requests against the store, falling back to the origin.
///
/// Shared across request handlers behind an `Arc`; all state is read-only
/// apart from the writeback queue.
pub struct TileResolver<C: AsyncHttpClient> {
    registry: Arc<ProviderRegistry>,
    store: Arc<dyn TileStore>,
    http_client: C,
    writeback: WritebackQueue,
    policy: CoordinatePolicy,
    request_timeout: Option<Duration>,
}

impl<C: AsyncHttpClient> TileResolver<C> {
    /// Create a resolver with pass-through coordinates, no request timeout
    /// and the default writeback concurrency.
    pub fn new(registry: Arc<ProviderRegistry>, store: Arc<dyn TileStore>, http_client: C) -> Self {
        let writeback = WritebackQueue::new(Arc::clone(&store), DEFAULT_MAX_CONCURRENT_WRITEBACKS);
        Self {
            registry,
            store,
            http_client,
            writeback,
            policy: CoordinatePolicy::default(),
            request_timeout: None,
        }
    }

    pub fn with_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bound the whole resolution (store and origin) to `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Replace the writeback queue, e.g. to change its concurrency limit.
    pub fn with_writeback_limit(mut self, max_concurrent: usize) -> Self {
        self.writeback = WritebackQueue::new(Arc::clone(&self.store), max_concurrent);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn TileStore> {
        &self.store
    }

    pub fn writeback(&self) -> &WritebackQueue {
        &self.writeback
    }

    pub fn policy(&self) -> CoordinatePolicy {
        self.policy
    }

    /// Resolve a tile to its payload.
    pub async fn resolve(&self, request: &TileRequest) -> Result<Bytes, ResolveError> {
        self.resolve_detailed(request).await.map(|tile| tile.data)
    }

    /// Resolve a tile, also reporting its key and where it came from.
    pub async fn resolve_detailed(&self, request: &TileRequest) -> Result<ResolvedTile, ResolveError> {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.resolve_uncapped(request))
                .await
                .map_err(|_| {
                    warn!(request = %request, timeout_ms = limit.as_millis() as u64, "Tile request timed out");
                    ResolveError::TimedOut(limit)
                })?,
            None => self.resolve_uncapped(request).await,
        }
    }

    /// Resolve a tile, giving up when `cancel` fires.
    ///
    /// A writeback already scheduled before cancellation still runs.
    pub async fn resolve_with_cancel(
        &self,
        request: &TileRequest,
        cancel: &CancellationToken,
    ) -> Result<ResolvedTile, ResolveError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(request = %request, "Tile request cancelled");
                Err(ResolveError::Cancelled)
            }
            result = self.resolve_detailed(request) => result,
        }
    }

    async fn resolve_uncapped(&self, request: &TileRequest) -> Result<ResolvedTile, ResolveError> {
        self.policy.check(request.coordinate())?;

        // Registry lookup is in-memory; doing it first keeps an unregistered
        // provider from reaching the store as a malformed key.
        let descriptor = self.registry.resolve(request.provider(), request.theme())?;

        let key = CacheKey::for_request(request);
        let cached = self
            .store
            .exists(key.as_str())
            .await
            .map_err(|source| cache_error("exists", &key, source))?;

        if cached {
            self.read_cached(key).await
        } else {
            self.fetch_origin(descriptor, request, key).await
        }
    }

    async fn read_cached(&self, key: CacheKey) -> Result<ResolvedTile, ResolveError> {
        let data = self
            .store
            .get(key.as_str())
            .await
            .map_err(|source| cache_error("get", &key, source))?
            .ok_or_else(|| {
                // Removed between the existence check and the read.
                cache_error(
                    "get",
                    &key,
                    StoreError::Backend("object disappeared after existence check".to_string()),
                )
            })?;

        if data.is_empty() {
            return Err(ResolveError::EmptyPayload {
                from: TileSource::Cache,
                key,
            });
        }

        debug!(key = %key, bytes = data.len(), "Cache hit");
        Ok(ResolvedTile {
            key,
            data,
            served_from: TileSource::Cache,
        })
    }

    async fn fetch_origin(
        &self,
        descriptor: &ProviderDescriptor,
        request: &TileRequest,
        key: CacheKey,
    ) -> Result<ResolvedTile, ResolveError> {
        let url = origin_url(descriptor, request.coordinate())?;

        if let Some(param) = descriptor.credential_param.as_deref() {
            if has_blank_credential(&url, param) {
                warn!(provider = %descriptor.name, param, "Refusing origin fetch without credential");
                return Err(ResolveError::Configuration {
                    provider: descriptor.name.clone(),
                    param: param.to_string(),
                });
            }
        }

        debug!(key = %key, url = strip_query(&url), "Cache miss, fetching from origin");
        let body = self
            .http_client
            .get(&url)
            .await
            .map_err(ResolveError::OriginFetch)?;

        if body.is_empty() {
            return Err(ResolveError::EmptyPayload {
                from: TileSource::Origin,
                key,
            });
        }

        let data = Bytes::from(body);
        self.writeback.schedule(key.clone(), data.clone());

        info!(key = %key, bytes = data.len(), "Tile fetched from origin");
        Ok(ResolvedTile {
            key,
            data,
            served_from: TileSource::Origin,
        })
    }
}

fn cache_error(operation: &'static str, key: &CacheKey, source: StoreError) -> ResolveError {
    ResolveError::CacheBackend {
        operation,
        key: key.clone(),
        source,
    }
}
