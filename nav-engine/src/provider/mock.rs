//! Mock routing provider for testing without network access.
//!
//! Serves scripted responses in FIFO order and records every request.
//! Individual responses can be gated on a `Notify` so tests can resolve
//! in-flight requests out of order (stale-result suppression).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::geo::Coordinate;
use crate::model::Route;

use super::{Profile, ProviderError, RouteResponse, RoutingProvider};

struct Scripted {
    gate: Option<Arc<Notify>>,
    result: Result<RouteResponse, ProviderError>,
}

/// Scripted mock provider.
///
/// Mirrors the real provider interface; `calculate_route` pops the next
/// scripted response (waiting on its gate first, when one was attached)
/// and `match_trace` pops from its own queue. An exhausted script answers
/// `NoRoute`.
#[derive(Default)]
pub struct MockRoutingProvider {
    route_script: Mutex<VecDeque<Scripted>>,
    match_script: Mutex<VecDeque<Result<Route, ProviderError>>>,
    route_calls: Mutex<Vec<Vec<Coordinate>>>,
}

impl MockRoutingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful single-route response.
    pub fn enqueue_route(&self, route: Route) {
        self.enqueue_response(RouteResponse::single(route));
    }

    /// Queue a full response (primary + alternates).
    pub fn enqueue_response(&self, response: RouteResponse) {
        self.route_script.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Ok(response),
        });
    }

    /// Queue an error response.
    pub fn enqueue_error(&self, error: ProviderError) {
        self.route_script.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Err(error),
        });
    }

    /// Queue a successful response that is not returned until the caller
    /// fires the returned gate with `notify_one`.
    pub fn enqueue_gated_route(&self, route: Route) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.route_script.lock().unwrap().push_back(Scripted {
            gate: Some(gate.clone()),
            result: Ok(RouteResponse::single(route)),
        });
        gate
    }

    /// Queue a map-matching response.
    pub fn enqueue_match(&self, result: Result<Route, ProviderError>) {
        self.match_script.lock().unwrap().push_back(result);
    }

    /// Waypoint lists received by `calculate_route`, in call order.
    pub fn recorded_route_calls(&self) -> Vec<Vec<Coordinate>> {
        self.route_calls.lock().unwrap().clone()
    }
}

impl RoutingProvider for MockRoutingProvider {
    async fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        _profile: Profile,
    ) -> Result<RouteResponse, ProviderError> {
        self.route_calls.lock().unwrap().push(waypoints.to_vec());

        let scripted = self.route_script.lock().unwrap().pop_front();
        let Some(scripted) = scripted else {
            return Err(ProviderError::NoRoute);
        };

        if let Some(gate) = &scripted.gate {
            gate.notified().await;
        }

        scripted.result
    }

    async fn match_trace(
        &self,
        _groups: &[Vec<Coordinate>],
        _profile: Profile,
    ) -> Result<Route, ProviderError> {
        let next = self.match_script.lock().unwrap().pop_front();
        next.unwrap_or(Err(ProviderError::NoRoute))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc as StdArc;

    use super::*;
    use crate::model::{Leg, Maneuver, Step};

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn route() -> Route {
        let step = StdArc::new(
            Step::from_shape(
                vec![c(0.0, 0.0), c(0.0, 1.0)],
                Maneuver::basic(100.0, "go", 10.0),
            )
            .unwrap(),
        );
        Route::from_legs(vec![StdArc::new(Leg::new(vec![step]).unwrap())]).unwrap()
    }

    #[tokio::test]
    async fn responses_pop_in_fifo_order() {
        let mock = MockRoutingProvider::new();
        mock.enqueue_route(route());
        mock.enqueue_error(ProviderError::RateLimited);

        let first = mock.calculate_route(&[c(0.0, 0.0)], Profile::Driving).await;
        assert!(first.is_ok());

        let second = mock.calculate_route(&[c(0.0, 0.0)], Profile::Driving).await;
        assert!(matches!(second, Err(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn exhausted_script_answers_no_route() {
        let mock = MockRoutingProvider::new();
        let result = mock.calculate_route(&[c(1.0, 1.0)], Profile::Driving).await;
        assert!(matches!(result, Err(ProviderError::NoRoute)));
    }

    #[tokio::test]
    async fn records_waypoints() {
        let mock = MockRoutingProvider::new();
        mock.enqueue_route(route());

        let waypoints = vec![c(1.0, 2.0), c(3.0, 4.0)];
        let _ = mock.calculate_route(&waypoints, Profile::Driving).await;

        assert_eq!(mock.recorded_route_calls(), vec![waypoints]);
    }

    #[tokio::test]
    async fn gated_response_waits_for_notify() {
        let mock = StdArc::new(MockRoutingProvider::new());
        let gate = mock.enqueue_gated_route(route());

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move {
                mock.calculate_route(&[c(0.0, 0.0)], Profile::Driving).await
            })
        };

        // The call must stay pending until the gate fires.
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        let result = task.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn match_trace_uses_its_own_queue() {
        let mock = MockRoutingProvider::new();
        mock.enqueue_match(Ok(route()));

        let matched = mock
            .match_trace(&[vec![c(0.0, 0.0), c(0.0, 1.0)]], Profile::Driving)
            .await;
        assert!(matched.is_ok());

        let exhausted = mock.match_trace(&[vec![]], Profile::Driving).await;
        assert!(matches!(exhausted, Err(ProviderError::NoRoute)));
    }
}
