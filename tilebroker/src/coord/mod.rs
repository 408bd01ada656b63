//! Tile addressing.
//!
//! A [`TileRequest`] names a tile by provider, theme and a literal
//! (x, y, z) coordinate. Coordinates are kept as the caller's text; range
//! checks and y-axis flipping are explicit, opt-in policies.
//!
//! # Example
//!
//! ```
//! use tilebroker::coord::{CoordinatePolicy, ProviderId, ThemeMode, TileCoordinate, TileRequest};
//!
//! let coordinate = TileCoordinate::new("3", "2", "5").unwrap();
//! let request = TileRequest::new(ProviderId::new("MapTiler"), ThemeMode::Dark, coordinate);
//!
//! assert_eq!(request.provider().as_str(), "maptiler");
//! assert!(CoordinatePolicy::Validate { max_zoom: 18 }
//!     .check(request.coordinate())
//!     .is_ok());
//! ```

mod policy;
mod types;

pub use policy::{CoordinatePolicy, TileScheme, DEFAULT_MAX_ZOOM};
pub use types::{CoordError, ProviderId, ThemeMode, TileCoordinate, TileRequest};
