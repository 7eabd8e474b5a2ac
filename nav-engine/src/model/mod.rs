//! Core route model: Route → Leg → Step → Maneuver.
//!
//! All composite types validate their invariants at construction, so code
//! receiving them can trust non-emptiness and shape endpoint consistency.
//! Routes are immutable values; a reroute produces a new `Route` that
//! structurally shares untouched legs.

mod error;
mod leg;
mod maneuver;
mod route;
mod step;
mod stop;
mod trip;

pub use error::ModelError;
pub use leg::Leg;
pub use maneuver::{Intersection, JunctionExit, Maneuver, ManeuverKind, TurnDirection};
pub use route::Route;
pub use step::Step;
pub use stop::{Stop, StopKind};
pub use trip::Trip;
