//! Tile resolution.
//!
//! [`TileResolver`] serves a [`TileRequest`](crate::coord::TileRequest) from
//! the tile store when it can and from the provider's origin when it must,
//! handing origin payloads to the [`WritebackQueue`] for detached caching.

mod cache_aside;
mod types;
mod writeback;

pub use cache_aside::TileResolver;
pub use types::{ResolveError, ResolvedTile, TileSource};
pub use writeback::{WritebackQueue, WritebackStats, DEFAULT_MAX_CONCURRENT_WRITEBACKS};
