//! Error responses for the tile endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::resolver::ResolveError;

/// Fixed `error` field of every failure body.
pub const TILE_ERROR_MESSAGE: &str = "Failed to get image";

/// JSON body returned when a tile cannot be served.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub kind: &'static str,
    pub message: String,
}

/// A failed tile request, rendered as `400 Bad Request` with an
/// [`ErrorBody`].
#[derive(Debug)]
pub struct TileError(pub ResolveError);

impl From<ResolveError> for TileError {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: TILE_ERROR_MESSAGE,
            kind: self.0.kind(),
            message: self.0.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
