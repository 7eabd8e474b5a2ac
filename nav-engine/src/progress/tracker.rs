//! Projection of live positions onto the planned route.

use std::sync::Arc;

use crate::geo::{Coordinate, heading_delta_deg, initial_bearing_deg};
use crate::model::{Leg, Step};

use super::ProgressConfig;

/// Outcome of the secondary check run when no step matches the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffRouteCheck {
    /// Still plausibly near the path (one of the two checks passed);
    /// treat the sample as sensor noise and change no state.
    Tolerated,
    /// Both the distance and heading checks failed for this sample.
    OffRoute,
}

/// The point in the step's shape nearest to `position`, with its index.
///
/// Ties are broken by first occurrence in shape order (strict `<` during
/// the scan). Returns `None` for an empty shape.
pub fn closest_coordinate(step: &Step, position: &Coordinate) -> Option<(usize, Coordinate)> {
    let mut best: Option<(usize, Coordinate, f64)> = None;

    for (idx, point) in step.shape().iter().enumerate() {
        let d = position.distance_m(point);
        match &best {
            Some((_, _, best_d)) if d >= *best_d => {}
            _ => best = Some((idx, *point, d)),
        }
    }

    best.map(|(idx, point, _)| (idx, point))
}

/// Minimum distance from `position` to the step's shape, metres.
/// `None` for an empty shape.
pub fn distance_to_step_m(step: &Step, position: &Coordinate) -> Option<f64> {
    closest_coordinate(step, position).map(|(_, point)| position.distance_m(&point))
}

/// True iff `position` is within `threshold_m` of the step's shape.
pub fn is_on_route(step: &Step, position: &Coordinate, threshold_m: f64) -> bool {
    distance_to_step_m(step, position).is_some_and(|d| d <= threshold_m)
}

/// The first step of the leg (in order) the position is on, at the
/// 50 m "on current step" threshold.
pub fn determine_current_step(
    leg: &Leg,
    position: &Coordinate,
    config: &ProgressConfig,
) -> Option<Arc<Step>> {
    leg.steps()
        .iter()
        .find(|s| is_on_route(s, position, config.on_step_threshold_m))
        .cloned()
}

/// True iff `position` is within the arrival threshold of the leg's end.
pub fn is_destination_reached(leg: &Leg, position: &Coordinate, config: &ProgressConfig) -> bool {
    position.distance_m(&leg.end_coordinate()) <= config.arrival_threshold_m
}

/// Bearing of the path at shape index `idx`: toward the next point, or
/// from the previous point for the final index. `None` when the shape has
/// fewer than two points.
fn path_bearing_at(step: &Step, idx: usize) -> Option<f64> {
    let shape = step.shape();
    if shape.len() < 2 {
        return None;
    }
    if idx + 1 < shape.len() {
        Some(initial_bearing_deg(&shape[idx], &shape[idx + 1]))
    } else {
        Some(initial_bearing_deg(&shape[idx - 1], &shape[idx]))
    }
}

/// Secondary off-route check, run only when `determine_current_step`
/// found nothing.
///
/// The sample counts as off-route only when BOTH fail:
/// - distance: more than `reroute_threshold_m` from every step's shape;
/// - heading: reported heading deviates from the local path bearing by
///   more than `heading_tolerance_deg`.
///
/// A missing or zero heading cannot confirm alignment and counts as a
/// failed heading check, leaving the decision to the distance check.
pub fn off_route_check(
    leg: &Leg,
    position: &Coordinate,
    heading: Option<f64>,
    config: &ProgressConfig,
) -> OffRouteCheck {
    // Globally closest shape point across the leg's steps.
    let mut best: Option<(f64, &Arc<Step>, usize)> = None;
    for step in leg.steps() {
        if let Some((idx, point)) = closest_coordinate(step, position) {
            let d = position.distance_m(&point);
            if best.as_ref().is_none_or(|(best_d, _, _)| d < *best_d) {
                best = Some((d, step, idx));
            }
        }
    }

    let Some((distance, step, idx)) = best else {
        // No shape data at all; distance cannot vouch for the position.
        return OffRouteCheck::OffRoute;
    };

    if distance <= config.reroute_threshold_m {
        return OffRouteCheck::Tolerated;
    }

    let aligned = match (heading, path_bearing_at(step, idx)) {
        (Some(h), Some(path)) if h != 0.0 => {
            heading_delta_deg(h, path) <= config.heading_tolerance_deg
        }
        _ => false,
    };

    if aligned {
        OffRouteCheck::Tolerated
    } else {
        OffRouteCheck::OffRoute
    }
}
