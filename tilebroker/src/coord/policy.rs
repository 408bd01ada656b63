//! Coordinate validation and y-axis conventions.

use std::borrow::Cow;
use std::str::FromStr;

use super::types::{CoordError, TileCoordinate};

/// Deepest zoom level accepted when validation is enabled and no explicit
/// limit is configured.
pub const DEFAULT_MAX_ZOOM: u8 = 22;

/// How inbound coordinates are checked before any I/O happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Literal values flow unchanged into cache keys and origin URLs.
    #[default]
    PassThrough,
    /// `z <= max_zoom` and `0 <= x, y < 2^z`, all as unsigned integers.
    Validate { max_zoom: u8 },
}

impl CoordinatePolicy {
    /// Check a coordinate against this policy.
    pub fn check(&self, coordinate: &TileCoordinate) -> Result<(), CoordError> {
        match *self {
            CoordinatePolicy::PassThrough => Ok(()),
            CoordinatePolicy::Validate { max_zoom } => {
                let z = parse_axis('z', coordinate.z())?;
                if z > u64::from(max_zoom) {
                    return Err(CoordError::OutOfRange {
                        axis: 'z',
                        value: z,
                        max: u64::from(max_zoom),
                    });
                }
                let max_index = tiles_per_axis(z) - 1;
                for (axis, value) in [('x', coordinate.x()), ('y', coordinate.y())] {
                    let parsed = parse_axis(axis, value)?;
                    if parsed > max_index {
                        return Err(CoordError::OutOfRange {
                            axis,
                            value: parsed,
                            max: max_index,
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

/// Y-axis origin convention used by a tile origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileScheme {
    /// y = 0 at the top (XYZ / slippy map).
    #[default]
    Xyz,
    /// y = 0 at the bottom (TMS).
    Tms,
}

impl TileScheme {
    /// Returns the y value to send to an origin using this scheme.
    ///
    /// Requests are always addressed in XYZ. For `Xyz` origins the literal
    /// value is passed through; for `Tms` origins it is flipped to
    /// `2^z - 1 - y`, which needs integer y and z.
    pub fn origin_y<'a>(&self, coordinate: &'a TileCoordinate) -> Result<Cow<'a, str>, CoordError> {
        match self {
            TileScheme::Xyz => Ok(Cow::Borrowed(coordinate.y())),
            TileScheme::Tms => {
                let z = parse_axis('z', coordinate.z())?;
                let y = parse_axis('y', coordinate.y())?;
                if z > 63 {
                    return Err(CoordError::OutOfRange {
                        axis: 'z',
                        value: z,
                        max: 63,
                    });
                }
                let max_index = tiles_per_axis(z) - 1;
                if y > max_index {
                    return Err(CoordError::OutOfRange {
                        axis: 'y',
                        value: y,
                        max: max_index,
                    });
                }
                Ok(Cow::Owned((max_index - y).to_string()))
            }
        }
    }
}

impl FromStr for TileScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xyz" => Ok(TileScheme::Xyz),
            "tms" => Ok(TileScheme::Tms),
            other => Err(format!("unknown tile scheme '{}'", other)),
        }
    }
}

fn parse_axis(axis: char, value: &str) -> Result<u64, CoordError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoordError::NotAnInteger {
            axis,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| CoordError::NotAnInteger {
        axis,
        value: value.to_string(),
    })
}

/// Number of tiles along one axis at zoom `z` (saturates for absurd zooms).
fn tiles_per_axis(z: u64) -> u64 {
    1u64.checked_shl(z as u32).filter(|_| z < 64).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: &str, y: &str, z: &str) -> TileCoordinate {
        TileCoordinate::new(x, y, z).unwrap()
    }

    #[test]
    fn test_pass_through_accepts_anything_well_formed() {
        let policy = CoordinatePolicy::PassThrough;
        assert!(policy.check(&coord("999999", "-4", "80")).is_ok());
        assert!(policy.check(&coord("3.5", "2", "5")).is_ok());
    }

    #[test]
    fn test_validate_accepts_in_range() {
        let policy = CoordinatePolicy::Validate { max_zoom: 18 };
        assert!(policy.check(&coord("0", "0", "0")).is_ok());
        assert!(policy.check(&coord("31", "31", "5")).is_ok());
        assert!(policy.check(&coord("262143", "0", "18")).is_ok());
    }

    #[test]
    fn test_validate_rejects_zoom_above_max() {
        let policy = CoordinatePolicy::Validate { max_zoom: 18 };
        assert_eq!(
            policy.check(&coord("0", "0", "19")),
            Err(CoordError::OutOfRange {
                axis: 'z',
                value: 19,
                max: 18
            })
        );
    }

    #[test]
    fn test_validate_rejects_index_outside_pyramid() {
        let policy = CoordinatePolicy::Validate { max_zoom: 18 };
        assert_eq!(
            policy.check(&coord("32", "0", "5")),
            Err(CoordError::OutOfRange {
                axis: 'x',
                value: 32,
                max: 31
            })
        );
        assert!(matches!(
            policy.check(&coord("0", "32", "5")),
            Err(CoordError::OutOfRange { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_integers() {
        let policy = CoordinatePolicy::Validate { max_zoom: 18 };
        assert!(matches!(
            policy.check(&coord("3.0", "2", "5")),
            Err(CoordError::NotAnInteger { axis: 'x', .. })
        ));
        assert!(matches!(
            policy.check(&coord("3", "-2", "5")),
            Err(CoordError::NotAnInteger { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_xyz_scheme_passes_literal_y() {
        let c = coord("3", "02", "5");
        assert_eq!(TileScheme::Xyz.origin_y(&c).unwrap(), "02");
    }

    #[test]
    fn test_tms_scheme_flips_y() {
        assert_eq!(TileScheme::Tms.origin_y(&coord("3", "2", "5")).unwrap(), "29");
        assert_eq!(TileScheme::Tms.origin_y(&coord("0", "0", "0")).unwrap(), "0");
        assert_eq!(TileScheme::Tms.origin_y(&coord("0", "0", "1")).unwrap(), "1");
    }

    #[test]
    fn test_tms_scheme_needs_integers() {
        assert!(TileScheme::Tms.origin_y(&coord("3", "2.5", "5")).is_err());
        assert!(TileScheme::Tms.origin_y(&coord("3", "40", "5")).is_err());
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("TMS".parse::<TileScheme>().unwrap(), TileScheme::Tms);
        assert_eq!("xyz".parse::<TileScheme>().unwrap(), TileScheme::Xyz);
        assert!("wmts".parse::<TileScheme>().is_err());
    }
}
