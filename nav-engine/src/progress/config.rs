//! Thresholds for progress tracking and off-route detection.

/// Configuration parameters for the progress tracker and navigation
/// session.
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Maximum distance from a step's shape to count as "on" that step,
    /// metres. Checked on every accepted location sample.
    pub on_step_threshold_m: f64,

    /// Wider tolerance used by the secondary off-route check when no step
    /// matches, metres.
    pub reroute_threshold_m: f64,

    /// Maximum deviation between the reported heading and the local path
    /// bearing before the heading check fails, degrees.
    pub heading_tolerance_deg: f64,

    /// Distance from the leg's end coordinate at which the leg's
    /// destination counts as reached, metres.
    pub arrival_threshold_m: f64,

    /// Consecutive fully off-route samples required before a correction is
    /// requested. Debouncing is the only rate limiting on reroutes.
    pub off_route_debounce: u32,

    /// Minimum movement from the last accepted sample for a new sample to
    /// be significant, metres.
    pub min_move_m: f64,

    /// Reported speed at which a sample is significant regardless of
    /// movement, metres per second.
    pub min_speed_mps: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            on_step_threshold_m: 50.0,
            reroute_threshold_m: 200.0,
            heading_tolerance_deg: 90.0,
            arrival_threshold_m: 100.0,
            off_route_debounce: 2,
            min_move_m: 50.0,
            min_speed_mps: 1.5,
        }
    }
}
