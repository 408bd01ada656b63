//! Route table and handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::TILE_CONTENT_TYPE;
use crate::coord::{ProviderId, ThemeMode, TileCoordinate, TileRequest};
use crate::provider::{AsyncHttpClient, ProviderSummary};
use crate::resolver::{TileResolver, TileSource};

use super::error::TileError;

/// Response header reporting whether the tile came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Shared handler state.
pub struct ServerState<C: AsyncHttpClient> {
    resolver: Arc<TileResolver<C>>,
}

impl<C: AsyncHttpClient> ServerState<C> {
    pub fn new(resolver: Arc<TileResolver<C>>) -> Self {
        Self { resolver }
    }
}

impl<C: AsyncHttpClient> Clone for ServerState<C> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}

/// Query parameters of the tile route.
#[derive(Debug, Default, Deserialize)]
pub struct TileQuery {
    pub provider: Option<String>,
    pub theme: Option<String>,
}

/// Build the router.
///
/// - `GET /map/:x/:y/:z?provider=<id>&theme=<light|...>`
/// - `GET /providers`
/// - `GET /health`
pub fn router<C: AsyncHttpClient + 'static>(resolver: Arc<TileResolver<C>>) -> Router {
    Router::new()
        .route("/map/:x/:y/:z", get(get_tile::<C>))
        .route("/providers", get(list_providers::<C>))
        .route("/health", get(health))
        .with_state(ServerState::new(resolver))
}

async fn get_tile<C: AsyncHttpClient + 'static>(
    State(state): State<ServerState<C>>,
    Path((x, y, z)): Path<(String, String, String)>,
    Query(query): Query<TileQuery>,
) -> Result<Response, TileError> {
    let provider = ProviderId::new(query.provider.unwrap_or_default());
    let theme = ThemeMode::from_query(query.theme.as_deref());
    let coordinate = TileCoordinate::new(x, y, z).map_err(|e| TileError(e.into()))?;
    let request = TileRequest::new(provider, theme, coordinate);

    match state.resolver.resolve_detailed(&request).await {
        Ok(tile) => {
            debug!(request = %request, source = %tile.served_from, bytes = tile.data.len(), "Tile served");
            let cache_status = match tile.served_from {
                TileSource::Cache => "HIT",
                TileSource::Origin => "MISS",
            };
            Ok((
                [
                    (header::CONTENT_TYPE, TILE_CONTENT_TYPE),
                    (header::HeaderName::from_static(CACHE_STATUS_HEADER), cache_status),
                ],
                tile.data,
            )
                .into_response())
        }
        Err(e) => {
            warn!(request = %request, kind = e.kind(), error = %e, "Tile request failed");
            Err(TileError(e))
        }
    }
}

async fn list_providers<C: AsyncHttpClient + 'static>(
    State(state): State<ServerState<C>>,
) -> Json<Vec<ProviderSummary>> {
    Json(state.resolver.registry().summaries())
}

async fn health() -> &'static str {
    "ok"
}
