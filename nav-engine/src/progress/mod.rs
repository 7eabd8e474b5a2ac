//! Progress tracking: which step is the traveler on, and are they still
//! on the planned path at all.
//!
//! Everything here is a pure function over the route model so it stays
//! cheap enough to run on every location sample.

mod config;
mod tracker;

pub use config::ProgressConfig;
pub use tracker::{
    OffRouteCheck, closest_coordinate, determine_current_step, distance_to_step_m,
    is_destination_reached, is_on_route, off_route_check,
};
