//! Geometric primitives shared by every layer.
//!
//! All distances are metres, all angles degrees, all coordinates WGS84.

mod bearing;
mod coordinate;
mod subsample;

pub use bearing::{heading_delta_deg, initial_bearing_deg, normalize_deg};
pub use coordinate::{Coordinate, InvalidCoordinate};
pub use subsample::{MAX_PERSISTED_POINTS, subsample};
