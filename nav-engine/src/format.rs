//! Human-facing instruction and ETA formatting.

use std::sync::Arc;

use crate::geo::{Coordinate, initial_bearing_deg};
use crate::model::{Leg, Route, Step};
use crate::progress::closest_coordinate;

/// Feet per metre.
const FEET_PER_M: f64 = 3.28084;

/// Feet per mile.
const FEET_PER_MILE: f64 = 5_280.0;

/// Below this many feet distances render in feet, above in miles.
const MILES_CUTOVER_FT: f64 = 800.0;

/// Sum of maneuver distances from `current` (inclusive) to the leg's end,
/// metres. Falls back to the whole leg when `current` is not one of its
/// steps.
pub fn remaining_distance_m(leg: &Leg, current: &Arc<Step>) -> f64 {
    let start = leg.step_index(current).unwrap_or(0);
    leg.steps()[start..]
        .iter()
        .map(|s| s.maneuver().distance_m)
        .sum()
}

/// Sum of maneuver travel times from `current` (inclusive) to the leg's
/// end, seconds.
pub fn remaining_time_s(leg: &Leg, current: &Arc<Step>) -> f64 {
    let start = leg.step_index(current).unwrap_or(0);
    leg.steps()[start..]
        .iter()
        .map(|s| s.maneuver().expected_time_s)
        .sum()
}

/// Distance until the step's maneuver, metres.
///
/// `((total - idx) / total) * maneuver.distance` where `idx` is the index
/// of the closest shape coordinate: a linear-interpolation proxy for
/// remaining arc length, not the true value. An empty shape falls back to
/// the straight-line distance to the step's end.
pub fn distance_to_next_maneuver_m(step: &Step, position: &Coordinate) -> f64 {
    match closest_coordinate(step, position) {
        Some((idx, _)) => {
            let total = step.shape().len() as f64;
            ((total - idx as f64) / total) * step.maneuver().distance_m
        }
        None => position.distance_m(&step.end_coordinate()),
    }
}

/// Render a distance for display.
///
/// Converted to feet; under 800 ft the value is rounded DOWN to the
/// nearest hundred feet ("700 feet"), otherwise rendered as miles to one
/// decimal place ("2.3 miles"). The threshold and rounding are load-bearing
/// for output parity with shipped clients.
pub fn distance_descriptor(meters: f64) -> String {
    let feet = meters * FEET_PER_M;
    if feet < MILES_CUTOVER_FT {
        let hundreds = (feet / 100.0).floor() as i64 * 100;
        format!("{hundreds} feet")
    } else {
        format!("{:.1} miles", feet / FEET_PER_MILE)
    }
}

/// Direction-of-travel for the compass/camera.
///
/// A live non-zero heading wins; otherwise, while navigating, the initial
/// great-circle bearing from the current position to the route's start
/// coordinate; otherwise 0.
pub fn bearing_deg(position: &Coordinate, heading: Option<f64>, route: Option<&Route>) -> f64 {
    match heading {
        Some(h) if h != 0.0 => h,
        _ => match route {
            Some(route) => initial_bearing_deg(position, &route.start_coordinate()),
            None => 0.0,
        },
    }
}

/// Compose the display sentence for a step's maneuver.
///
/// "In {distance}, {verb} {direction} onto {street}." — the street clause
/// is dropped (trailing period kept) when no street name is available.
/// Returns an empty string when the maneuver carries no structured kind.
pub fn step_instruction(step: &Step, distance_m: f64) -> String {
    let maneuver = step.maneuver();
    let Some(kind) = maneuver.kind else {
        return String::new();
    };

    let mut sentence = format!("In {}, {}", distance_descriptor(distance_m), kind);

    if let Some(direction) = maneuver.direction {
        sentence.push(' ');
        sentence.push_str(&direction.to_string());
    }

    if let Some(street) = maneuver.street_name.as_deref() {
        sentence.push_str(" onto ");
        sentence.push_str(street);
    }

    sentence.push('.');
    sentence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Maneuver, ManeuverKind, TurnDirection};

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn step(dist: f64, time: f64) -> Arc<Step> {
        Arc::new(
            Step::from_shape(
                vec![c(0.0, 0.0), c(0.0, 0.001)],
                Maneuver::basic(dist, "go", time),
            )
            .unwrap(),
        )
    }

    fn meters_for_feet(feet: f64) -> f64 {
        feet / FEET_PER_M
    }

    #[test]
    fn descriptor_feet_rounds_down() {
        assert_eq!(distance_descriptor(meters_for_feet(734.0)), "700 feet");
        assert_eq!(distance_descriptor(meters_for_feet(799.0)), "700 feet");
        assert_eq!(distance_descriptor(meters_for_feet(120.0)), "100 feet");
        assert_eq!(distance_descriptor(meters_for_feet(99.0)), "0 feet");
    }

    #[test]
    fn descriptor_miles_above_cutover() {
        assert_eq!(distance_descriptor(meters_for_feet(801.0)), "0.2 miles");
        assert_eq!(distance_descriptor(1609.34), "1.0 miles");
        assert_eq!(distance_descriptor(3701.5), "2.3 miles");
    }

    #[test]
    fn remaining_sums_from_current_step() {
        let steps = vec![step(100.0, 10.0), step(200.0, 20.0), step(300.0, 30.0)];
        let leg = Leg::new(steps).unwrap();

        let second = leg.steps()[1].clone();
        assert_eq!(remaining_distance_m(&leg, &second), 500.0);
        assert_eq!(remaining_time_s(&leg, &second), 50.0);

        let first = leg.steps()[0].clone();
        assert_eq!(remaining_distance_m(&leg, &first), 600.0);
    }

    #[test]
    fn remaining_unknown_step_covers_whole_leg() {
        let leg = Leg::new(vec![step(100.0, 10.0), step(200.0, 20.0)]).unwrap();
        let foreign = step(1.0, 1.0);
        assert_eq!(remaining_distance_m(&leg, &foreign), 300.0);
    }

    #[test]
    fn maneuver_distance_is_linear_proxy() {
        // Four shape points; closest index 1 of 4 leaves 3/4 of the
        // maneuver distance.
        let shape = vec![c(0.0, 0.0), c(0.0, 0.001), c(0.0, 0.002), c(0.0, 0.003)];
        let s = Step::from_shape(shape, Maneuver::basic(400.0, "go", 30.0)).unwrap();

        let near_second = c(0.0, 0.00101);
        let d = distance_to_next_maneuver_m(&s, &near_second);
        assert!((d - 300.0).abs() < 1e-9, "got {d}");

        // At the first point the full distance remains.
        let at_start = c(0.0, 0.0);
        assert_eq!(distance_to_next_maneuver_m(&s, &at_start), 400.0);
    }

    #[test]
    fn maneuver_distance_empty_shape_falls_back() {
        let s = Step::new(
            c(0.0, 0.0),
            c(0.0, 0.001),
            vec![],
            Maneuver::basic(400.0, "go", 30.0),
        )
        .unwrap();

        let d = distance_to_next_maneuver_m(&s, &c(0.0, 0.0));
        let straight = c(0.0, 0.0).distance_m(&c(0.0, 0.001));
        assert!((d - straight).abs() < 1e-9);
    }

    #[test]
    fn bearing_prefers_live_heading() {
        assert_eq!(bearing_deg(&c(0.0, 0.0), Some(123.0), None), 123.0);
    }

    #[test]
    fn bearing_zero_heading_falls_through() {
        let route = {
            let leg = Leg::new(vec![step(100.0, 10.0)]).unwrap();
            Route::from_legs(vec![Arc::new(leg)]).unwrap()
        };
        // Route starts at (0,0); from (−1,0) that is due north.
        let b = bearing_deg(&c(-1.0, 0.0), Some(0.0), Some(&route));
        assert!((b - 0.0).abs() < 1e-9);
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn bearing_idle_without_route() {
        assert_eq!(bearing_deg(&c(0.0, 0.0), None, None), 0.0);
    }

    #[test]
    fn instruction_full_sentence() {
        let maneuver = Maneuver::basic(100.0, "", 10.0)
            .with_kind(ManeuverKind::Turn, Some(TurnDirection::Left))
            .with_street("Main Street");
        let s = Step::from_shape(vec![c(0.0, 0.0), c(0.0, 0.001)], maneuver).unwrap();

        assert_eq!(
            step_instruction(&s, meters_for_feet(734.0)),
            "In 700 feet, turn left onto Main Street."
        );
    }

    #[test]
    fn instruction_without_street_keeps_period() {
        let maneuver = Maneuver::basic(100.0, "", 10.0)
            .with_kind(ManeuverKind::Turn, Some(TurnDirection::Right));
        let s = Step::from_shape(vec![c(0.0, 0.0), c(0.0, 0.001)], maneuver).unwrap();

        assert_eq!(
            step_instruction(&s, meters_for_feet(734.0)),
            "In 700 feet, turn right."
        );
    }

    #[test]
    fn instruction_without_direction() {
        let maneuver = Maneuver::basic(100.0, "", 10.0)
            .with_kind(ManeuverKind::Continue, None)
            .with_street("Market Street");
        let s = Step::from_shape(vec![c(0.0, 0.0), c(0.0, 0.001)], maneuver).unwrap();

        assert_eq!(
            step_instruction(&s, 3701.5),
            "In 2.3 miles, continue onto Market Street."
        );
    }

    #[test]
    fn instruction_empty_without_structure() {
        let s = Step::from_shape(
            vec![c(0.0, 0.0), c(0.0, 0.001)],
            Maneuver::basic(100.0, "free text only", 10.0),
        )
        .unwrap();
        assert_eq!(step_instruction(&s, 100.0), "");
    }
}
