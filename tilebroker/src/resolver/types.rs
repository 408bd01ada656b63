//! Resolver types and errors

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

use crate::cache::{CacheKey, StoreError};
use crate::coord::{CoordError, ProviderId};
use crate::provider::{ProviderError, RegistryError};

/// Where a resolved tile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSource {
    /// Served from the tile store.
    Cache,
    /// Downloaded from the origin; a writeback was scheduled.
    Origin,
}

impl fmt::Display for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileSource::Cache => f.write_str("cache"),
            TileSource::Origin => f.write_str("origin"),
        }
    }
}

/// A successfully resolved tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTile {
    pub key: CacheKey,
    pub data: Bytes,
    pub served_from: TileSource,
}

/// Terminal failure of a tile request.
///
/// Every variant reaches the caller. Writeback failures never appear here;
/// they are logged by the writeback queue.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Provider not registered, or not registered for the requested theme.
    #[error(transparent)]
    UnknownProvider(#[from] RegistryError),

    /// Origin credential missing; the origin was not contacted.
    #[error("Provider '{provider}' has no credential configured ('{param}=' is blank)")]
    Configuration { provider: ProviderId, param: String },

    /// Existence check, read or write against the store failed.
    #[error("Cache backend {operation} failed for '{key}': {source}")]
    CacheBackend {
        operation: &'static str,
        key: CacheKey,
        #[source]
        source: StoreError,
    },

    /// Transport failure or non-2xx status from the origin.
    #[error("Origin fetch failed: {0}")]
    OriginFetch(#[source] ProviderError),

    /// Zero-length payload from the origin or the store.
    #[error("Empty payload from {from} for '{key}'")]
    EmptyPayload { from: TileSource, key: CacheKey },

    /// Coordinate rejected by the active coordinate policy or tile scheme.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// The request exceeded its time budget.
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
}

impl ResolveError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::UnknownProvider(_) => "unknown_provider",
            ResolveError::Configuration { .. } => "configuration",
            ResolveError::CacheBackend { .. } => "cache_backend",
            ResolveError::OriginFetch(_) => "origin_fetch",
            ResolveError::EmptyPayload { .. } => "empty_payload",
            ResolveError::InvalidCoordinate(_) => "invalid_coordinate",
            ResolveError::Cancelled => "cancelled",
            ResolveError::TimedOut(_) => "timed_out",
        }
    }
}
