//! Step: the smallest routable unit, one maneuver plus a shape.

use crate::geo::Coordinate;

use super::{Maneuver, ModelError};

/// A step of a leg: start/end coordinates, the polyline shape between
/// them, and the maneuver performed at the step.
///
/// Steps are held behind `Arc` by their owning `Leg`; the "current step"
/// of a navigation session is located by pointer identity (`Arc::ptr_eq`),
/// which is stable for the lifetime of one `Route`.
///
/// # Invariants
///
/// - When `shape` is non-empty, its first point equals `start` and its
///   last point equals `end` (checked at construction).
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    start: Coordinate,
    end: Coordinate,
    shape: Vec<Coordinate>,
    maneuver: Maneuver,
}

impl Step {
    /// Construct a step, validating shape endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeEndpointMismatch` when a non-empty shape
    /// does not begin at `start` or end at `end`.
    pub fn new(
        start: Coordinate,
        end: Coordinate,
        shape: Vec<Coordinate>,
        maneuver: Maneuver,
    ) -> Result<Self, ModelError> {
        if let (Some(first), Some(last)) = (shape.first(), shape.last()) {
            if *first != start {
                return Err(ModelError::ShapeEndpointMismatch(
                    "first point must equal step start",
                ));
            }
            if *last != end {
                return Err(ModelError::ShapeEndpointMismatch(
                    "last point must equal step end",
                ));
            }
        }

        Ok(Self {
            start,
            end,
            shape,
            maneuver,
        })
    }

    /// Convenience constructor deriving start/end from a non-empty shape.
    pub fn from_shape(shape: Vec<Coordinate>, maneuver: Maneuver) -> Result<Self, ModelError> {
        let (Some(first), Some(last)) = (shape.first(), shape.last()) else {
            return Err(ModelError::ShapeEndpointMismatch(
                "shape must be non-empty to derive endpoints",
            ));
        };
        let (start, end) = (*first, *last);
        Self::new(start, end, shape, maneuver)
    }

    pub fn start_coordinate(&self) -> Coordinate {
        self.start
    }

    pub fn end_coordinate(&self) -> Coordinate {
        self.end
    }

    /// The polyline of the step. May be empty for degenerate provider data.
    pub fn shape(&self) -> &[Coordinate] {
        &self.shape
    }

    pub fn maneuver(&self) -> &Maneuver {
        &self.maneuver
    }
}
