//! Leg: the path between two consecutive waypoints.

use std::sync::Arc;

use crate::geo::Coordinate;

use super::{ModelError, Step};

/// An ordered, non-empty sequence of steps between two waypoints.
///
/// `Arc<Step>` lets the navigation session hold the current step by
/// identity; `Arc<Leg>` likewise lets reroute splices locate the leg to
/// replace by pointer identity rather than content equality.
///
/// # Invariants
///
/// - At least one step (checked at construction).
/// - Concatenating the steps' shapes yields the leg's full path.
#[derive(Debug, Clone)]
pub struct Leg {
    steps: Vec<Arc<Step>>,
}

impl Leg {
    /// Construct a leg from its steps.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyLeg` when `steps` is empty.
    pub fn new(steps: Vec<Arc<Step>>) -> Result<Self, ModelError> {
        if steps.is_empty() {
            return Err(ModelError::EmptyLeg);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Arc<Step>] {
        &self.steps
    }

    /// Start coordinate: the first step's start.
    pub fn start_coordinate(&self) -> Coordinate {
        // Safe: non-empty validated at construction
        self.steps[0].start_coordinate()
    }

    /// End coordinate: the last step's end.
    pub fn end_coordinate(&self) -> Coordinate {
        self.steps[self.steps.len() - 1].end_coordinate()
    }

    /// The leg's full path: all step shapes concatenated in order.
    pub fn full_shape(&self) -> Vec<Coordinate> {
        self.steps
            .iter()
            .flat_map(|s| s.shape().iter().copied())
            .collect()
    }

    /// Sum of maneuver distances across the leg, metres.
    pub fn distance_m(&self) -> f64 {
        self.steps.iter().map(|s| s.maneuver().distance_m).sum()
    }

    /// Sum of maneuver travel times across the leg, seconds.
    pub fn expected_time_s(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| s.maneuver().expected_time_s)
            .sum()
    }

    /// Position of a step within the leg, located by pointer identity.
    pub fn step_index(&self, step: &Arc<Step>) -> Option<usize> {
        self.steps.iter().position(|s| Arc::ptr_eq(s, step))
    }

    /// The step following `step`, if any.
    pub fn step_after(&self, step: &Arc<Step>) -> Option<Arc<Step>> {
        let idx = self.step_index(step)?;
        self.steps.get(idx + 1).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Maneuver;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn step(shape: Vec<Coordinate>, dist: f64, time: f64) -> Arc<Step> {
        Arc::new(Step::from_shape(shape, Maneuver::basic(dist, "go", time)).unwrap())
    }

    fn two_step_leg() -> Leg {
        let s1 = step(vec![c(0.0, 0.0), c(0.0, 1.0)], 100.0, 10.0);
        let s2 = step(vec![c(0.0, 1.0), c(0.0, 2.0), c(0.0, 3.0)], 200.0, 20.0);
        Leg::new(vec![s1, s2]).unwrap()
    }

    #[test]
    fn empty_leg_rejected() {
        assert!(matches!(Leg::new(vec![]), Err(ModelError::EmptyLeg)));
    }

    #[test]
    fn endpoints_come_from_first_and_last_step() {
        let leg = two_step_leg();
        assert_eq!(leg.start_coordinate(), c(0.0, 0.0));
        assert_eq!(leg.end_coordinate(), c(0.0, 3.0));
    }

    #[test]
    fn full_shape_concatenates_steps() {
        let leg = two_step_leg();
        let shape = leg.full_shape();
        assert_eq!(
            shape,
            vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, 1.0), c(0.0, 2.0), c(0.0, 3.0)]
        );
        assert_eq!(shape.first().copied(), Some(leg.start_coordinate()));
        assert_eq!(shape.last().copied(), Some(leg.end_coordinate()));
    }

    #[test]
    fn aggregates_sum_maneuvers() {
        let leg = two_step_leg();
        assert_eq!(leg.distance_m(), 300.0);
        assert_eq!(leg.expected_time_s(), 30.0);
    }

    #[test]
    fn step_index_uses_identity() {
        let leg = two_step_leg();
        let first = leg.steps()[0].clone();
        assert_eq!(leg.step_index(&first), Some(0));

        // A content-equal but distinct allocation is not the same step.
        let clone = Arc::new((*first).clone());
        assert_eq!(leg.step_index(&clone), None);
    }

    #[test]
    fn step_after_walks_forward() {
        let leg = two_step_leg();
        let first = leg.steps()[0].clone();
        let second = leg.step_after(&first).unwrap();
        assert!(Arc::ptr_eq(&second, &leg.steps()[1]));
        assert!(leg.step_after(&second).is_none());
    }
}
