//! Rerouting: regenerate a corrected segment and splice it into the
//! existing route without discarding untouched legs.
//!
//! This module holds the pure planning/splicing logic. The asynchronous
//! orchestration (issuing provider requests, token bookkeeping, applying
//! results) lives in the navigation session.

mod error;
mod splice;

pub use error::RerouteError;
pub use splice::{
    CorrectionOutcome, StopInsertionOutcome, apply_correction, apply_stop_insertion,
    collapse_into_leg, correction_waypoints, insertion_waypoints,
};
