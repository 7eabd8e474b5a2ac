//! Compact persisted route encoding.
//!
//! A route is stored as one semicolon-separated `"lat,lon"` string per leg
//! (subsampled to at most 100 points, endpoints preserved exactly) plus
//! the route's scalar time and distance. The subsampled points are an
//! approximation of the original path, so decoding re-requests a route
//! from the routing provider with the stored groups as map-matching hints.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, MAX_PERSISTED_POINTS, subsample};
use crate::model::Route;
use crate::provider::{Profile, ProviderError, RoutingProvider};

/// Errors decoding or storing a persisted route.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A stored coordinate pair cannot be parsed.
    ///
    /// Older clients decoded such pairs to (0, 0) and carried on; that
    /// silently bends the route through the Gulf of Guinea, so the decode
    /// fails instead and the caller regenerates the trip.
    #[error("malformed coordinate {text:?} in leg {leg}")]
    MalformedCoordinate { leg: usize, text: String },

    /// Record contains no legs
    #[error("record contains no legs")]
    Empty,

    /// Provider failed to match the stored trace back into a route
    #[error("route reconstruction failed: {0}")]
    Provider(#[from] ProviderError),

    /// Reading or writing the record file failed
    #[error("record IO failed: {0}")]
    Io(#[from] std::io::Error),

    /// Record file is not valid JSON
    #[error("record serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted form of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// One subsampled `"lat,lon;lat,lon;…"` string per leg.
    pub legs: Vec<String>,
    /// Expected travel time for the whole route, seconds.
    pub expected_time_s: f64,
    /// Total distance for the whole route, metres.
    pub distance_m: f64,
}

impl RouteRecord {
    /// Encode a route: each leg's shape subsampled to ≤100 points.
    pub fn encode(route: &Route) -> Self {
        let legs = route
            .legs()
            .iter()
            .map(|leg| {
                subsample(&leg.full_shape(), MAX_PERSISTED_POINTS)
                    .iter()
                    .map(Coordinate::to_string)
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .collect();

        Self {
            legs,
            expected_time_s: route.total_time_s(),
            distance_m: route.total_distance_m(),
        }
    }

    /// Parse the stored strings back into per-leg coordinate groups.
    pub fn coordinate_groups(&self) -> Result<Vec<Vec<Coordinate>>, RecordError> {
        if self.legs.is_empty() {
            return Err(RecordError::Empty);
        }

        self.legs
            .iter()
            .enumerate()
            .map(|(leg, encoded)| {
                encoded
                    .split(';')
                    .filter(|pair| !pair.is_empty())
                    .map(|pair| {
                        Coordinate::parse(pair).map_err(|_| RecordError::MalformedCoordinate {
                            leg,
                            text: pair.to_string(),
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Reconstruct a full route by map-matching the stored groups through
    /// the routing provider.
    pub async fn reconstruct<P: RoutingProvider>(
        &self,
        provider: &P,
        profile: Profile,
    ) -> Result<Route, RecordError> {
        let groups = self.coordinate_groups()?;
        Ok(provider.match_trace(&groups, profile).await?)
    }

    /// Write the record to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a record from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Leg, Maneuver, Step};
    use crate::provider::mock::MockRoutingProvider;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn long_route(points_per_leg: usize, legs: usize) -> Route {
        let mut arcs = Vec::new();
        for l in 0..legs {
            let shape: Vec<Coordinate> = (0..points_per_leg)
                .map(|i| c(l as f64, i as f64 * 1e-4))
                .collect();
            let step = Arc::new(
                Step::from_shape(shape, Maneuver::basic(1000.0, "go", 60.0)).unwrap(),
            );
            arcs.push(Arc::new(Leg::new(vec![step]).unwrap()));
        }
        Route::new(arcs, 5_000.0, 600.0).unwrap()
    }

    #[test]
    fn encode_bounds_points_and_keeps_endpoints() {
        let route = long_route(450, 2);
        let record = RouteRecord::encode(&route);

        assert_eq!(record.legs.len(), 2);
        assert_eq!(record.distance_m, 5_000.0);
        assert_eq!(record.expected_time_s, 600.0);

        for (i, leg) in record.legs.iter().enumerate() {
            let pairs: Vec<&str> = leg.split(';').collect();
            assert!(pairs.len() <= MAX_PERSISTED_POINTS, "leg {i}");

            let original = route.legs()[i].full_shape();
            let last = Coordinate::parse(pairs.last().unwrap()).unwrap();
            assert!(last.distance_m(original.last().unwrap()) < 0.01);
            let first = Coordinate::parse(pairs[0]).unwrap();
            assert!(first.distance_m(&original[0]) < 0.01);
        }
    }

    #[test]
    fn groups_roundtrip_within_display_precision() {
        let route = long_route(40, 1);
        let record = RouteRecord::encode(&route);
        let groups = record.coordinate_groups().unwrap();

        let original = route.legs()[0].full_shape();
        // Short leg: stride 1, so every original point is present.
        for (stored, orig) in groups[0].iter().zip(&original) {
            assert!(stored.distance_m(orig) < 0.2);
        }
    }

    #[test]
    fn malformed_pair_fails_decode() {
        let record = RouteRecord {
            legs: vec!["1.0,2.0;garbage;3.0,4.0".into()],
            expected_time_s: 0.0,
            distance_m: 0.0,
        };

        let err = record.coordinate_groups().unwrap_err();
        assert!(matches!(
            err,
            RecordError::MalformedCoordinate { leg: 0, .. }
        ));
    }

    #[test]
    fn empty_record_fails_decode() {
        let record = RouteRecord {
            legs: vec![],
            expected_time_s: 0.0,
            distance_m: 0.0,
        };
        assert!(matches!(
            record.coordinate_groups(),
            Err(RecordError::Empty)
        ));
    }

    #[tokio::test]
    async fn reconstruct_goes_through_the_provider() {
        let route = long_route(40, 1);
        let record = RouteRecord::encode(&route);

        let mock = MockRoutingProvider::new();
        mock.enqueue_match(Ok(route.clone()));

        let rebuilt = record.reconstruct(&mock, Profile::Driving).await.unwrap();
        assert_eq!(rebuilt.full_shape(), route.full_shape());
    }

    #[tokio::test]
    async fn reconstruct_propagates_provider_failure() {
        let route = long_route(40, 1);
        let record = RouteRecord::encode(&route);

        let mock = MockRoutingProvider::new();
        mock.enqueue_match(Err(ProviderError::NoRoute));

        let result = record.reconstruct(&mock, Profile::Driving).await;
        assert!(matches!(result, Err(RecordError::Provider(_))));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let route = long_route(120, 3);
        let record = RouteRecord::encode(&route);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trip.json");

        record.save(&path).unwrap();
        let loaded = RouteRecord::load(&path).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = RouteRecord::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(RecordError::Io(_))));
    }
}
