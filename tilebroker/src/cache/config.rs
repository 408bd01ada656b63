//! Store selection.

use std::path::PathBuf;
use std::sync::Arc;

use super::providers::{DiskTileStore, MemoryTileStore};
use super::traits::{StoreError, TileStore};

/// Default memory store size (512 MB).
pub const DEFAULT_MEMORY_STORE_SIZE: u64 = 512 * 1024 * 1024;

/// Which backend holds cached tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Volatile in-process store bounded by size.
    Memory { max_size_bytes: u64 },
    /// Filesystem object store rooted at `directory`.
    Disk { directory: PathBuf },
}

impl StoreConfig {
    pub fn memory(max_size_bytes: u64) -> Self {
        Self::Memory { max_size_bytes }
    }

    pub fn disk(directory: impl Into<PathBuf>) -> Self {
        Self::Disk {
            directory: directory.into(),
        }
    }

    /// Backend name as written in configuration files.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Disk { .. } => "disk",
        }
    }

    /// Open the configured store.
    pub async fn open(&self) -> Result<Arc<dyn TileStore>, StoreError> {
        match self {
            Self::Memory { max_size_bytes } => Ok(Arc::new(MemoryTileStore::new(*max_size_bytes))),
            Self::Disk { directory } => Ok(Arc::new(DiskTileStore::open(directory.clone()).await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_memory() {
        let store = StoreConfig::memory(1024).open().await.unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_open_disk() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::disk(dir.path().join("store"));
        let store = config.open().await.unwrap();
        assert_eq!(store.name(), "disk");
        assert_eq!(config.backend_name(), "disk");
        assert!(dir.path().join("store").is_dir());
    }
}
