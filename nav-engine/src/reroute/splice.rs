//! Waypoint planning and route splicing.

use std::sync::Arc;

use crate::geo::Coordinate;
use crate::model::{Leg, Route, Step, Stop, Trip};
use crate::progress::{ProgressConfig, determine_current_step};

use super::RerouteError;

/// Result of applying an off-route correction to a route value.
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    /// The spliced route; untouched legs are shared with the input.
    pub route: Route,
    /// The replacement leg, now part of `route`.
    pub current_leg: Arc<Leg>,
    /// Index of the replacement leg within `route`.
    pub leg_index: usize,
    /// The step under the traveler, recomputed against the new leg.
    pub current_step: Arc<Step>,
}

/// Result of applying a stop insertion to a trip value.
#[derive(Debug, Clone)]
pub struct StopInsertionOutcome {
    /// New trip: spliced route plus the stop list with the stop inserted.
    pub trip: Trip,
    /// Index of the first of the two new legs (== the new stop's index).
    pub leg_index: usize,
    /// The first of the two new legs; navigation continues on it.
    pub current_leg: Arc<Leg>,
    /// The step under the traveler, if the position matches one.
    pub current_step: Option<Arc<Step>>,
}

/// Waypoints for an off-route correction: `[position, leg end]`, with the
/// leg's start prepended when the traveler never reached the leg's first
/// step (so the corrected leg still departs from the proper boundary).
pub fn correction_waypoints(
    leg: &Leg,
    position: Coordinate,
    reached_first_step: bool,
) -> Vec<Coordinate> {
    let mut waypoints = vec![position, leg.end_coordinate()];
    if !reached_first_step {
        waypoints.insert(0, leg.start_coordinate());
    }
    waypoints
}

/// Waypoints for a mid-leg stop insertion: `[leg start, stop, leg end]`.
///
/// # Errors
///
/// `RerouteError::Splice` when the stop has no coordinate.
pub fn insertion_waypoints(leg: &Leg, stop: &Stop) -> Result<Vec<Coordinate>, RerouteError> {
    let stop_coordinate = stop
        .coordinate
        .ok_or(RerouteError::Splice("stop has no coordinate"))?;

    Ok(vec![
        leg.start_coordinate(),
        stop_coordinate,
        leg.end_coordinate(),
    ])
}

/// Concatenate the steps of every leg of `route` into one leg, discarding
/// provider-side leg boundaries. The whole correction is treated as a
/// single leg of the original route.
pub fn collapse_into_leg(route: &Route) -> Result<Leg, RerouteError> {
    let steps: Vec<Arc<Step>> = route
        .legs()
        .iter()
        .flat_map(|l| l.steps().iter().cloned())
        .collect();

    Leg::new(steps).map_err(|_| RerouteError::Splice("corrected route produced no steps"))
}

/// Apply an off-route correction: collapse the provider result into one
/// leg, replace `target` in `route` by identity, and recompute the current
/// step at `position`.
///
/// Fails without side effects when the target leg is no longer part of the
/// route or the position matches no step of the corrected leg.
pub fn apply_correction(
    route: &Route,
    target: &Arc<Leg>,
    corrected: &Route,
    position: &Coordinate,
    config: &ProgressConfig,
) -> Result<CorrectionOutcome, RerouteError> {
    let new_leg = collapse_into_leg(corrected)?;

    let spliced = route
        .with_leg_replaced(target, new_leg)
        .ok_or(RerouteError::Splice("leg to replace is not in the route"))?;

    // with_leg_replaced keeps positions, so the index still holds.
    let leg_index = route
        .leg_index(target)
        .ok_or(RerouteError::Splice("leg to replace is not in the route"))?;
    let current_leg = spliced.legs()[leg_index].clone();

    let current_step = determine_current_step(&current_leg, position, config)
        .ok_or(RerouteError::NoMatchingStep)?;

    Ok(CorrectionOutcome {
        route: spliced,
        current_leg,
        leg_index,
        current_step,
    })
}

/// Apply a mid-leg stop insertion: the provider must have returned exactly
/// two legs (start→stop, stop→end); the leg to replace is located in the
/// CURRENT route by start coordinate; the stop lands at the same index in
/// the trip's stop list.
///
/// The returned outcome is a complete new `Trip` plus navigation state, so
/// the caller can commit route, stop list, and current leg/step together
/// or not at all.
pub fn apply_stop_insertion(
    trip: &Trip,
    target_start: Coordinate,
    generated: &Route,
    stop: Stop,
    position: &Coordinate,
    config: &ProgressConfig,
) -> Result<StopInsertionOutcome, RerouteError> {
    let [first, second] = generated.legs() else {
        return Err(RerouteError::Splice("expected exactly two legs"));
    };

    let leg_index = trip
        .route()
        .leg_index_by_start(target_start)
        .ok_or(RerouteError::Splice("leg to replace is not in the route"))?;

    let spliced = trip
        .route()
        .with_leg_split(
            leg_index,
            first.as_ref().clone(),
            second.as_ref().clone(),
        )
        .ok_or(RerouteError::Splice("leg to replace is not in the route"))?;

    let current_leg = spliced.legs()[leg_index].clone();
    let current_step = determine_current_step(&current_leg, position, config);

    let trip = trip.with_stop_inserted(spliced, leg_index, stop);

    Ok(StopInsertionOutcome {
        trip,
        leg_index,
        current_leg,
        current_step,
    })
}
