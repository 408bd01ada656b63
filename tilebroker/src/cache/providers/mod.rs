//! Tile store implementations.
//!
//! - [`MemoryTileStore`]: in-memory LRU store using moka
//! - [`DiskTileStore`]: filesystem object store, one file per tile
//!
//! Use [`StoreConfig::open`](crate::cache::StoreConfig::open) to create the
//! store selected by configuration.

mod disk;
mod memory;

pub use disk::DiskTileStore;
pub use memory::MemoryTileStore;
