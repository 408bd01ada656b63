//! Tile cache backed by an object store.
//!
//! The resolver talks to storage only through the [`TileStore`] trait,
//! addressing objects by [`CacheKey`].
//!
//! # Architecture
//!
//! ```text
//! TileRequest ──► CacheKey ("maptiler/0/5/3/2.png")
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────────┐
//! │            Arc<dyn TileStore>               │
//! │  exists(key) · get(key) · put(key, bytes)   │
//! └──────────────┬───────────────┬──────────────┘
//!                ▼               ▼
//!        MemoryTileStore   DiskTileStore
//! ```

mod config;
mod key;
mod providers;
mod traits;

pub use config::{StoreConfig, DEFAULT_MEMORY_STORE_SIZE};
pub use key::{CacheKey, TILE_CONTENT_TYPE};
pub use providers::{DiskTileStore, MemoryTileStore};
pub use traits::{BoxFuture, StoreError, TileStore};
