//! Location samples pushed into the session.

use chrono::{DateTime, Utc};

use crate::geo::Coordinate;
use crate::progress::ProgressConfig;

/// One positioning fix from the location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSample {
    pub coordinate: Coordinate,
    /// Course over ground, degrees clockwise from north. Sensors report
    /// zero when the heading is unknown, so zero is treated as absent.
    pub heading: Option<f64>,
    /// Ground speed, metres per second.
    pub speed_mps: Option<f64>,
    pub altitude_m: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    /// Sample at `coordinate` timestamped now, with no sensor extras.
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            heading: None,
            speed_mps: None,
            altitude_m: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    /// Whether the sample is worth reacting to: moved at least
    /// `min_move_m` from the last accepted sample, or reported speed of at
    /// least `min_speed_mps`. The first sample is always significant.
    pub fn is_significant(&self, last_accepted: Option<&Coordinate>, config: &ProgressConfig) -> bool {
        if self.speed_mps.is_some_and(|s| s >= config.min_speed_mps) {
            return true;
        }
        match last_accepted {
            None => true,
            Some(prev) => self.coordinate.distance_m(prev) >= config.min_move_m,
        }
    }
}
