//! Cache key derivation.
//!
//! Keys follow the format `{provider}/{theme_ordinal}/{z}/{x}/{y}.png` and use
//! the caller's literal coordinate text. Two callers formatting the same tile
//! differently (`"2"` vs `"02"`) get two keys: duplication, never aliasing.

use std::fmt;

use crate::coord::TileRequest;

/// Content type recorded for every stored tile and every tile response.
pub const TILE_CONTENT_TYPE: &str = "image/png";

/// Deterministic object key for a tile request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a request.
    ///
    /// ```
    /// use tilebroker::cache::CacheKey;
    /// use tilebroker::coord::{ProviderId, ThemeMode, TileCoordinate, TileRequest};
    ///
    /// let request = TileRequest::new(
    ///     ProviderId::new("maptiler"),
    ///     ThemeMode::Dark,
    ///     TileCoordinate::new("3", "2", "5").unwrap(),
    /// );
    /// assert_eq!(CacheKey::for_request(&request).as_str(), "maptiler/0/5/3/2.png");
    /// ```
    pub fn for_request(request: &TileRequest) -> Self {
        let coordinate = request.coordinate();
        Self(format!(
            "{}/{}/{}/{}/{}.png",
            request.provider(),
            request.theme().ordinal(),
            coordinate.z(),
            coordinate.x(),
            coordinate.y()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
