//! Stop: a named, addressed point a route is generated through.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Category tag for a stop. One tagged type replaces per-category POI
/// structs; code that only needs `{name, address, coordinate}` ignores the
/// tag, and the UI picks an icon from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    Pin,
    Restaurant,
    Hotel,
    GasStation,
    Charging,
    Custom,
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopKind::Pin => "pin",
            StopKind::Restaurant => "restaurant",
            StopKind::Hotel => "hotel",
            StopKind::GasStation => "gas station",
            StopKind::Charging => "charging",
            StopKind::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// A waypoint of a trip.
///
/// The coordinate is optional: stops sourced from an address search may
/// not have been geocoded yet. Operations that need a position (stop
/// insertion) fail cleanly when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub kind: StopKind,
    pub address: Option<String>,
    pub coordinate: Option<Coordinate>,
}

impl Stop {
    pub fn new(name: impl Into<String>, kind: StopKind) -> Self {
        Self {
            name: name.into(),
            kind,
            address: None,
            coordinate: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }
}
