//! Core trait for the tile object store.
//!
//! The `TileStore` trait is the narrow interface the resolver needs from a
//! persistent blob store: existence check, read and write by key.
//!
//! # Design
//!
//! - **String keys**: object paths such as `maptiler/0/5/3/2.png`
//! - **Bytes values**: opaque payloads, cheap to share with background tasks
//! - **Dyn-compatible**: uses `Pin<Box<dyn Future>>` so stores can live
//!   behind `Arc<dyn TileStore>`

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// "Not found" is never an error: `exists` returns `false` and `get`
/// returns `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error talking to the backing storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped to an object path.
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    /// Backend-specific failure (auth, quota, remote error).
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistent blob store holding cached tiles.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`; writeback tasks hold the
/// store for longer than the request that scheduled them.
pub trait TileStore: Send + Sync {
    /// Check whether an object exists.
    ///
    /// # Errors
    ///
    /// Genuine backend failures only. Absence is `Ok(false)`.
    fn exists(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;

    /// Read an object.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the object exists
    /// - `Ok(None)` if it does not
    /// - `Err(_)` on backend failure
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, StoreError>>;

    /// Write an object, replacing any existing one.
    ///
    /// # Returns
    ///
    /// The location of the stored object, for logging.
    fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> BoxFuture<'_, Result<String, StoreError>>;

    /// Short backend name for logs (`memory`, `disk`).
    fn name(&self) -> &str;
}
