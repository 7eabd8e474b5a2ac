//! Routing provider boundary.
//!
//! The engine never computes roads itself; it asks a provider to turn an
//! ordered waypoint list into candidate routes, or to map-match a persisted
//! coordinate trace back into a route with steps. The trait abstraction
//! allows the session and record codec to be tested with mock data.

mod client;
mod convert;
mod error;
pub mod mock;
mod types;

use std::fmt;
use std::future::Future;

pub use client::{HttpRoutingProvider, RoutingConfig};
pub use convert::ConvertError;
pub use error::ProviderError;
pub use types::{
    DirectionsResponse, GeometryDto, IntersectionDto, LegDto, ManeuverDto, MatchResponse,
    RouteDto, StepDto,
};

use crate::geo::Coordinate;
use crate::model::Route;

/// Travel profile a route is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Profile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Driving => "driving",
            Profile::Walking => "walking",
            Profile::Cycling => "cycling",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primary route plus zero or more alternates.
#[derive(Debug, Clone)]
pub struct RouteResponse {
    pub primary: Route,
    pub alternates: Vec<Route>,
}

impl RouteResponse {
    pub fn single(primary: Route) -> Self {
        Self {
            primary,
            alternates: Vec::new(),
        }
    }
}

/// Asynchronous routing provider.
///
/// Provider calls are network-bound and may take seconds; no timeout is
/// enforced here (callers impose their own). Futures are `Send` so the
/// session can run requests on spawned tasks without blocking the
/// location-sample path.
pub trait RoutingProvider: Send + Sync + 'static {
    /// Generate a route visiting `waypoints` in order.
    fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        profile: Profile,
    ) -> impl Future<Output = Result<RouteResponse, ProviderError>> + Send;

    /// Map-match ordered coordinate groups (one group per leg, typically
    /// subsampled from a persisted route) into a route with steps.
    fn match_trace(
        &self,
        groups: &[Vec<Coordinate>],
        profile: Profile,
    ) -> impl Future<Output = Result<Route, ProviderError>> + Send;
}
