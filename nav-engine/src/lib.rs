//! Route progress and rerouting engine for turn-by-turn navigation.
//!
//! Ingests a multi-leg route, tracks which leg/step the traveler occupies
//! from streamed position samples, detects departure from the planned path,
//! splices corrected route segments in without discarding untouched legs,
//! and formats maneuver instructions and remaining time/distance.

pub mod cache;
pub mod format;
pub mod geo;
pub mod model;
pub mod progress;
pub mod provider;
pub mod record;
pub mod reroute;
pub mod session;
