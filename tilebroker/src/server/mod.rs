//! Inbound HTTP surface.
//!
//! A thin axum adapter: extract coordinates and query parameters, call the
//! [`TileResolver`](crate::resolver::TileResolver), and map the outcome to
//! `200 image/png` or `400` with a JSON error body.

mod error;
mod routes;

use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::provider::AsyncHttpClient;
use crate::resolver::TileResolver;

pub use error::{ErrorBody, TileError, TILE_ERROR_MESSAGE};
pub use routes::{router, ServerState, TileQuery, CACHE_STATUS_HEADER};

/// Serve the tile endpoint on `listener` until `shutdown` is cancelled.
///
/// In-flight requests finish before this returns. Pending writebacks are not
/// drained here; see [`WritebackQueue::drain`](crate::resolver::WritebackQueue::drain).
pub async fn serve<C: AsyncHttpClient + 'static>(
    listener: TcpListener,
    resolver: Arc<TileResolver<C>>,
    shutdown: CancellationToken,
) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "Tile server listening");
    }

    axum::serve(listener, router(resolver))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Tile server stopped");
    Ok(())
}
