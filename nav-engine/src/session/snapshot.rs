//! UI-facing state published by the session.

use std::sync::Arc;

use crate::geo::Coordinate;
use crate::model::{Route, Step};

/// Macro-state of a navigation session.
///
/// Off-route corrections and stop insertions happen inside `Navigating`
/// without changing the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavPhase {
    /// No trip set.
    #[default]
    Idle,
    /// Trip set, navigation not started.
    Previewing,
    /// Advancing along the current leg on location updates.
    Navigating,
    /// Current leg's destination reached; waiting for a continue command.
    LegComplete,
    /// Last leg's destination reached.
    Finished,
}

/// Icon category for a map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Pin,
    TrafficSignal,
    StopSign,
}

/// A point the UI renders on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub coordinate: Coordinate,
    pub title: String,
    pub icon: MarkerIcon,
}

/// Complete render state for the UI, published through a watch channel
/// after every processed command or sample.
#[derive(Debug, Clone, Default)]
pub struct NavSnapshot {
    pub phase: NavPhase,
    pub route: Option<Route>,
    /// Index of the leg being navigated, once navigation has started.
    pub leg_index: Option<usize>,
    pub current_step: Option<Arc<Step>>,
    /// Stop pins plus the current step's signal/sign intersections.
    pub markers: Vec<MapMarker>,
    /// One polyline per leg, in leg order.
    pub polylines: Vec<Vec<Coordinate>>,
    pub distance_to_next_maneuver_m: Option<f64>,
    pub remaining_distance_m: Option<f64>,
    pub remaining_time_s: Option<f64>,
    /// Composed instruction for the current step; empty when the step
    /// carries no structured maneuver.
    pub instruction: Option<String>,
    /// Set while in `LegComplete` or `Finished`.
    pub destination_reached: bool,
    /// Set when the most recent reroute or stop insertion was abandoned;
    /// cleared once the traveler is matched to a step again.
    pub reroute_failed: bool,
}
