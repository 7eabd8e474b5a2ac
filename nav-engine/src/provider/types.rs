//! Wire types for the routing provider's JSON API.
//!
//! These mirror the provider's directions/map-matching response shape
//! (OSRM-compatible: GeoJSON `[lon, lat]` coordinate order). Conversion to
//! domain types lives in `convert.rs`.

use serde::Deserialize;

/// Top-level directions response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// "Ok" on success; anything else is a provider-side failure code.
    pub code: String,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// Top-level map-matching response.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
    pub code: String,
    #[serde(default)]
    pub matchings: Vec<RouteDto>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    /// Total distance, metres.
    pub distance: f64,
    /// Total expected travel time, seconds.
    pub duration: f64,
    pub legs: Vec<LegDto>,
}

/// One leg between consecutive waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LegDto {
    pub distance: f64,
    pub duration: f64,
    pub steps: Vec<StepDto>,
}

/// One step with its maneuver and shape.
#[derive(Debug, Clone, Deserialize)]
pub struct StepDto {
    pub distance: f64,
    pub duration: f64,
    /// Street the step travels along.
    #[serde(default)]
    pub name: Option<String>,
    pub maneuver: ManeuverDto,
    pub geometry: GeometryDto,
    #[serde(default)]
    pub intersections: Vec<IntersectionDto>,
    /// Signposted destinations at a junction.
    #[serde(default)]
    pub destinations: Option<String>,
    /// Exit numbers/names at a junction.
    #[serde(default)]
    pub exits: Option<String>,
}

/// Maneuver descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ManeuverDto {
    /// Maneuver category, e.g. "turn", "merge", "depart".
    #[serde(rename = "type")]
    pub kind: String,
    /// Relative direction, e.g. "left", "slight right".
    #[serde(default)]
    pub modifier: Option<String>,
    /// Roundabout exit number.
    #[serde(default)]
    pub exit: Option<u32>,
    /// `[lon, lat]` of the maneuver point.
    pub location: [f64; 2],
    /// Pre-composed instruction text, when the provider supplies one.
    #[serde(default)]
    pub instruction: Option<String>,
}

/// Step polyline as a GeoJSON-style line string.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryDto {
    /// `[lon, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

/// Intersection descriptor along a step.
#[derive(Debug, Clone, Deserialize)]
pub struct IntersectionDto {
    /// `[lon, lat]` of the intersection.
    pub location: [f64; 2],
    /// Feature classes, e.g. "traffic_signal", "stop_sign".
    #[serde(default)]
    pub classes: Vec<String>,
}
