//! Filesystem-backed object store.
//!
//! Objects are stored as plain files whose relative path is the key:
//!
//! ```text
//! {root}/maptiler/0/5/3/2.png
//! ```
//!
//! Writes go to a temporary sibling file and are renamed into place, so a
//! concurrent reader sees either the old object, the new one, or nothing.
//! Concurrent writers for the same key race; the last rename wins.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, info};

use crate::cache::traits::{BoxFuture, StoreError, TileStore};

/// Filesystem object store rooted at a directory.
pub struct DiskTileStore {
    root: PathBuf,
    temp_counter: AtomicU64,
}

impl DiskTileStore {
    /// Open a store, creating the root directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        info!(dir = %root.display(), "Disk tile store opened");

        Ok(Self {
            root,
            temp_counter: AtomicU64::new(0),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path under the root.
    ///
    /// Only plain relative components are accepted, so a key can never
    /// address a file outside the root.
    fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}.{}.tmp", file_name, std::process::id(), n))
    }
}

impl TileStore for DiskTileStore {
    fn exists(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let path = self.object_path(key);
        Box::pin(async move {
            let path = path?;
            match tokio::fs::metadata(&path).await {
                Ok(meta) => Ok(meta.is_file()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(StoreError::Io(e)),
            }
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>> {
        let path = self.object_path(key);
        Box::pin(async move {
            let path = path?;
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(Bytes::from(data))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StoreError::Io(e)),
            }
        })
    }

    fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> BoxFuture<'_, Result<String, StoreError>> {
        let path = self.object_path(key);
        let content_type = content_type.to_string();
        Box::pin(async move {
            let path = path?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let temp = self.temp_path(&path);
            if let Err(e) = tokio::fs::write(&temp, &data).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(StoreError::Io(e));
            }
            if let Err(e) = tokio::fs::rename(&temp, &path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(StoreError::Io(e));
            }

            debug!(
                path = %path.display(),
                bytes = data.len(),
                content_type = %content_type,
                "Object written"
            );
            Ok(path.display().to_string())
        })
    }

    fn name(&self) -> &str {
        "disk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, DiskTileStore) {
        let dir = TempDir::new().unwrap();
        let store = DiskTileStore::open(dir.path().join("tiles")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_root() {
        let (dir, store) = store().await;
        assert!(dir.path().join("tiles").is_dir());
        assert_eq!(store.root(), dir.path().join("tiles"));
    }

    #[tokio::test]
    async fn test_put_writes_nested_object() {
        let (_dir, store) = store().await;
        let location = store
            .put("maptiler/0/5/3/2.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        let expected = store.root().join("maptiler/0/5/3/2.png");
        assert_eq!(location, expected.display().to_string());
        assert_eq!(std::fs::read(&expected).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_exists_and_get() {
        let (_dir, store) = store().await;
        assert!(!store.exists("maptiler/0/5/3/2.png").await.unwrap());
        assert_eq!(store.get("maptiler/0/5/3/2.png").await.unwrap(), None);

        store
            .put("maptiler/0/5/3/2.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        assert!(store.exists("maptiler/0/5/3/2.png").await.unwrap());
        assert_eq!(
            store.get("maptiler/0/5/3/2.png").await.unwrap(),
            Some(Bytes::from_static(b"png"))
        );
    }

    #[tokio::test]
    async fn test_put_overwrites_and_leaves_no_temp_files() {
        let (_dir, store) = store().await;
        store.put("p/0/1/1/1.png", Bytes::from_static(b"a"), "image/png").await.unwrap();
        store.put("p/0/1/1/1.png", Bytes::from_static(b"b"), "image/png").await.unwrap();

        assert_eq!(
            store.get("p/0/1/1/1.png").await.unwrap(),
            Some(Bytes::from_static(b"b"))
        );
        let entries: Vec<_> = std::fs::read_dir(store.root().join("p/0/1/1"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let (_dir, store) = store().await;
        for key in ["../outside.png", "/abs/path.png", "a/../../b.png", "", "a\\b.png"] {
            assert!(
                matches!(store.exists(key).await, Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
        assert!(store
            .put("../x.png", Bytes::from_static(b"x"), "image/png")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_directory_is_not_an_object() {
        let (_dir, store) = store().await;
        store.put("p/0/1/1/1.png", Bytes::from_static(b"a"), "image/png").await.unwrap();
        assert!(!store.exists("p/0/1").await.unwrap());
    }
}
