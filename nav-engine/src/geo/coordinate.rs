//! WGS84 coordinate value type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean earth radius in metres, used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when parsing an invalid `"lat,lon"` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A (latitude, longitude) pair in degrees, WGS84.
///
/// Immutable value type; all geometry in the engine is expressed in terms
/// of these.
///
/// # Examples
///
/// ```
/// use nav_engine::geo::Coordinate;
///
/// let c = Coordinate::parse("51.5074,-0.1278").unwrap();
/// assert_eq!(c.latitude, 51.5074);
/// assert_eq!(c.longitude, -0.1278);
/// assert_eq!(c.to_string(), "51.507400,-0.127800");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a `"lat,lon"` pair.
    ///
    /// Both fields must be valid decimal numbers. There is no silent
    /// fallback for malformed input; callers decide how to recover.
    pub fn parse(s: &str) -> Result<Self, InvalidCoordinate> {
        let (lat, lon) = s.split_once(',').ok_or(InvalidCoordinate {
            reason: "expected two comma-separated fields",
        })?;

        let latitude: f64 = lat.trim().parse().map_err(|_| InvalidCoordinate {
            reason: "latitude is not a number",
        })?;
        let longitude: f64 = lon.trim().parse().map_err(|_| InvalidCoordinate {
            reason: "longitude is not a number",
        })?;

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate {
                reason: "coordinate fields must be finite",
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Haversine great-circle distance to `other`, in metres.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let c = Coordinate::parse("37.7749,-122.4194").unwrap();
        assert_eq!(c.latitude, 37.7749);
        assert_eq!(c.longitude, -122.4194);
    }

    #[test]
    fn parse_tolerates_whitespace() {
        let c = Coordinate::parse(" 37.7749 , -122.4194 ").unwrap();
        assert_eq!(c.latitude, 37.7749);
    }

    #[test]
    fn parse_rejects_missing_comma() {
        assert!(Coordinate::parse("37.7749 -122.4194").is_err());
        assert!(Coordinate::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!(Coordinate::parse("north,west").is_err());
        assert!(Coordinate::parse("37.7749,west").is_err());
        assert!(Coordinate::parse(",").is_err());
    }

    #[test]
    fn parse_rejects_non_finite() {
        assert!(Coordinate::parse("inf,0").is_err());
        assert!(Coordinate::parse("0,NaN").is_err());
    }

    #[test]
    fn display_roundtrip() {
        let c = Coordinate::new(51.5074, -0.1278);
        let parsed = Coordinate::parse(&c.to_string()).unwrap();
        assert!((parsed.latitude - c.latitude).abs() < 1e-6);
        assert!((parsed.longitude - c.longitude).abs() < 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Coordinate::new(48.8566, 2.3522);
        assert_eq!(c.distance_m(&c), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(48.8566, 2.3522);
        let b = Coordinate::new(51.5074, -0.1278);
        assert!((a.distance_m(&b) - b.distance_m(&a)).abs() < 1e-6);
    }

    #[test]
    fn distance_paris_to_london() {
        // Paris to London is ~344 km great-circle.
        let paris = Coordinate::new(48.8566, 2.3522);
        let london = Coordinate::new(51.5074, -0.1278);
        let d = paris.distance_m(&london);
        assert!((d - 344_000.0).abs() < 2_000.0, "got {d}");
    }

    #[test]
    fn distance_small_offsets() {
        // One degree of latitude is ~111.2 km everywhere.
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(11.0, 20.0);
        let d = a.distance_m(&b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }
}
