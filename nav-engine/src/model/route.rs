//! Route: the full path across a trip's ordered waypoints.

use std::sync::Arc;

use crate::geo::Coordinate;

use super::{Leg, ModelError};

/// An ordered, non-empty sequence of legs plus aggregate metrics.
///
/// Routes are immutable values. The splice operations return a *new*
/// `Route` that structurally shares every untouched `Arc<Leg>`, which is
/// what makes stale reroute results safe to discard: an old result refers
/// to legs of an old value and can never corrupt the current one.
#[derive(Debug, Clone)]
pub struct Route {
    legs: Vec<Arc<Leg>>,
    distance_m: f64,
    expected_time_s: f64,
}

impl Route {
    /// Construct a route with provider-supplied aggregate metrics.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyRoute` when `legs` is empty.
    pub fn new(
        legs: Vec<Arc<Leg>>,
        distance_m: f64,
        expected_time_s: f64,
    ) -> Result<Self, ModelError> {
        if legs.is_empty() {
            return Err(ModelError::EmptyRoute);
        }
        Ok(Self {
            legs,
            distance_m,
            expected_time_s,
        })
    }

    /// Construct a route deriving aggregates by summing leg maneuvers.
    pub fn from_legs(legs: Vec<Arc<Leg>>) -> Result<Self, ModelError> {
        let distance_m = legs.iter().map(|l| l.distance_m()).sum();
        let expected_time_s = legs.iter().map(|l| l.expected_time_s()).sum();
        Self::new(legs, distance_m, expected_time_s)
    }

    pub fn legs(&self) -> &[Arc<Leg>] {
        &self.legs
    }

    pub fn start_coordinate(&self) -> Coordinate {
        self.legs[0].start_coordinate()
    }

    pub fn end_coordinate(&self) -> Coordinate {
        self.legs[self.legs.len() - 1].end_coordinate()
    }

    /// Flattened coordinate sequence across all legs, in leg/step order.
    pub fn full_shape(&self) -> Vec<Coordinate> {
        self.legs
            .iter()
            .flat_map(|l| l.full_shape())
            .collect()
    }

    /// Total distance, metres. Provider-supplied and therefore possibly
    /// approximate; recomputed from maneuvers after a splice.
    pub fn total_distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Total expected travel time, seconds.
    pub fn total_time_s(&self) -> f64 {
        self.expected_time_s
    }

    /// Position of a leg within the route, located by pointer identity.
    pub fn leg_index(&self, leg: &Arc<Leg>) -> Option<usize> {
        self.legs.iter().position(|l| Arc::ptr_eq(l, leg))
    }

    /// Position of the leg whose start coordinate equals `start`.
    pub fn leg_index_by_start(&self, start: Coordinate) -> Option<usize> {
        self.legs
            .iter()
            .position(|l| l.start_coordinate() == start)
    }

    /// A new route with the leg identified by `target` replaced.
    ///
    /// Aggregates are rederived from maneuvers since the provider totals no
    /// longer describe the spliced path. Returns `None` when `target` is
    /// not a leg of this route.
    pub fn with_leg_replaced(&self, target: &Arc<Leg>, replacement: Leg) -> Option<Route> {
        let idx = self.leg_index(target)?;
        let mut legs = self.legs.clone();
        legs[idx] = Arc::new(replacement);
        Self::from_legs(legs).ok()
    }

    /// A new route with the leg at `index` removed and two legs inserted in
    /// its place (stop insertion). Returns `None` for an out-of-bounds
    /// index.
    pub fn with_leg_split(&self, index: usize, first: Leg, second: Leg) -> Option<Route> {
        if index >= self.legs.len() {
            return None;
        }
        let mut legs = self.legs.clone();
        legs.remove(index);
        legs.insert(index, Arc::new(second));
        legs.insert(index, Arc::new(first));
        Self::from_legs(legs).ok()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::{Maneuver, Step};
    use proptest::prelude::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    /// Build a route of `leg_sizes.len()` legs where leg i has
    /// `leg_sizes[i]` steps, each step a short two-point segment continuing
    /// where the previous one ended.
    fn build_route(leg_sizes: &[usize]) -> Route {
        let mut cursor = 0.0;
        let mut legs = Vec::new();

        for &steps in leg_sizes {
            let mut arcs = Vec::new();
            for _ in 0..steps.max(1) {
                let from = cursor;
                cursor += 0.01;
                let step = Step::from_shape(
                    vec![c(0.0, from), c(0.0, cursor)],
                    Maneuver::basic(1.0, "go", 1.0),
                )
                .unwrap();
                arcs.push(Arc::new(step));
            }
            legs.push(Arc::new(Leg::new(arcs).unwrap()));
        }

        Route::from_legs(legs).unwrap()
    }

    proptest! {
        /// Concatenating per-leg shapes equals the route's full shape.
        #[test]
        fn full_shape_consistency(leg_sizes in prop::collection::vec(1usize..6, 1..5)) {
            let route = build_route(&leg_sizes);

            let concatenated: Vec<Coordinate> =
                route.legs().iter().flat_map(|l| l.full_shape()).collect();

            prop_assert_eq!(route.full_shape(), concatenated);
        }

        /// Every leg's shape starts/ends at the leg endpoints.
        #[test]
        fn leg_shape_endpoints(leg_sizes in prop::collection::vec(1usize..6, 1..5)) {
            let route = build_route(&leg_sizes);

            for leg in route.legs() {
                let shape = leg.full_shape();
                prop_assert_eq!(shape.first().copied(), Some(leg.start_coordinate()));
                prop_assert_eq!(shape.last().copied(), Some(leg.end_coordinate()));
            }
        }
    }
}
