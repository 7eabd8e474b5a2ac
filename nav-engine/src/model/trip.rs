//! Trip: a generated route plus the ordered stops it runs through.

use crate::geo::Coordinate;

use super::{Route, Stop};

/// A route together with the intermediate stops it was generated through.
///
/// `stops` holds only the waypoints *between* the trip's start and end
/// locations, so stop index i sits at the boundary ending leg i: inserting
/// a stop into leg i puts it at stop index i.
///
/// Like `Route`, a `Trip` is an immutable value; stop insertion yields a
/// new value so the session can commit route, stop list, and navigation
/// state in one assignment.
#[derive(Debug, Clone)]
pub struct Trip {
    route: Route,
    stops: Vec<Stop>,
}

impl Trip {
    pub fn new(route: Route, stops: Vec<Stop>) -> Self {
        Self { route, stops }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Ordered waypoint coordinates the route spans: route start, each
    /// stop with a known coordinate, route end.
    pub fn waypoints(&self) -> Vec<Coordinate> {
        let mut points = vec![self.route.start_coordinate()];
        points.extend(self.stops.iter().filter_map(|s| s.coordinate));
        points.push(self.route.end_coordinate());
        points
    }

    /// A new trip with `route` swapped in, stops unchanged (off-route
    /// correction does not alter the stop list).
    pub fn with_route(&self, route: Route) -> Trip {
        Trip {
            route,
            stops: self.stops.clone(),
        }
    }

    /// A new trip with `route` swapped in and `stop` inserted at `index`.
    pub fn with_stop_inserted(&self, route: Route, index: usize, stop: Stop) -> Trip {
        let mut stops = self.stops.clone();
        let index = index.min(stops.len());
        stops.insert(index, stop);
        Trip { route, stops }
    }
}
