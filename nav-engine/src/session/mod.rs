//! Turn-by-turn navigation session.
//!
//! A session owns one trip and reacts to a stream of location samples:
//! it tracks progress along the current leg, detects off-route travel,
//! requests corrections from the routing provider, and publishes
//! render-ready state to subscribers.

mod actor;
mod location;
mod snapshot;

pub use actor::{NavigationHandle, NavigationSession};
pub use location::LocationSample;
pub use snapshot::{MapMarker, MarkerIcon, NavPhase, NavSnapshot};
