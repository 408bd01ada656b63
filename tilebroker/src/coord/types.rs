//! Tile request types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors produced while reading or checking tile coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// A coordinate component was empty, non-numeric or in scientific notation.
    #[error("Malformed {axis} coordinate '{value}'")]
    Malformed { axis: char, value: String },

    /// A coordinate component must be an unsigned integer under the active policy.
    #[error("{axis} coordinate '{value}' is not an unsigned integer")]
    NotAnInteger { axis: char, value: String },

    /// A coordinate component falls outside the tile pyramid.
    #[error("{axis} coordinate {value} out of range (max {max})")]
    OutOfRange { axis: char, value: u64, max: u64 },
}

/// Map colour theme requested by the client.
///
/// The ordinal is part of every cache key, so it must never change for an
/// existing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    /// Stable ordinal used in persistence paths (Dark = 0, Light = 1).
    pub fn ordinal(self) -> u8 {
        match self {
            ThemeMode::Dark => 0,
            ThemeMode::Light => 1,
        }
    }

    /// Interprets the `theme` query parameter.
    ///
    /// Only the exact value `"light"` selects [`ThemeMode::Light`]; anything
    /// else, including an absent parameter, selects [`ThemeMode::Dark`].
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("light") => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    /// Lower-case name, as used in configuration keys.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive name of a tile origin (e.g. `maptiler`).
///
/// The id is lower-cased on construction; all comparisons use that form.
///
/// ```
/// use tilebroker::coord::ProviderId;
///
/// assert_eq!(ProviderId::new("MapTiler"), ProviderId::new("maptiler"));
/// assert_eq!(ProviderId::new("MapTiler").as_str(), "maptiler");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id can stand as a single cache key segment: non-empty,
    /// not `.` or `..`, and free of path separators.
    pub fn is_key_segment(&self) -> bool {
        !matches!(self.0.as_str(), "" | "." | "..") && !self.0.contains(['/', '\\'])
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tile coordinate as supplied by the caller.
///
/// Components are kept as literal text so cache keys and origin URLs reflect
/// exactly what was requested, without float formatting drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    x: String,
    y: String,
    z: String,
}

impl TileCoordinate {
    /// Create a coordinate from literal components.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Malformed`] unless every component is plain
    /// decimal text (digits, optional sign and point; no exponent). No range
    /// check is applied here; see [`CoordinatePolicy`](super::CoordinatePolicy).
    pub fn new(
        x: impl Into<String>,
        y: impl Into<String>,
        z: impl Into<String>,
    ) -> Result<Self, CoordError> {
        let x = check_literal('x', x.into())?;
        let y = check_literal('y', y.into())?;
        let z = check_literal('z', z.into())?;
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> &str {
        &self.x
    }

    pub fn y(&self) -> &str {
        &self.y
    }

    pub fn z(&self) -> &str {
        &self.z
    }
}

fn check_literal(axis: char, value: String) -> Result<String, CoordError> {
    // Plain decimal text only: no exponent, no path separators.
    let well_formed = value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'));
    if !well_formed {
        return Err(CoordError::Malformed { axis, value });
    }
    Ok(value)
}

/// A single inbound tile request. Created per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileRequest {
    provider: ProviderId,
    theme: ThemeMode,
    coordinate: TileCoordinate,
}

impl TileRequest {
    pub fn new(provider: ProviderId, theme: ThemeMode, coordinate: TileCoordinate) -> Self {
        Self {
            provider,
            theme,
            coordinate,
        }
    }

    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn coordinate(&self) -> &TileCoordinate {
        &self.coordinate
    }
}

impl fmt::Display for TileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} z={} x={} y={}",
            self.provider,
            self.theme,
            self.coordinate.z(),
            self.coordinate.x(),
            self.coordinate.y()
        )
    }
}
