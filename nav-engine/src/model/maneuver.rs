//! Maneuver types: the turn/merge/continue instruction attached to a step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// The category of a maneuver, used to compose spoken/displayed
/// instructions. A maneuver without a kind carries only free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManeuverKind {
    Depart,
    Turn,
    Merge,
    Continue,
    ForkTake,
    RampTake,
    RoundaboutExit,
    Arrive,
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManeuverKind::Depart => "depart",
            ManeuverKind::Turn => "turn",
            ManeuverKind::Merge => "merge",
            ManeuverKind::Continue => "continue",
            ManeuverKind::ForkTake => "keep",
            ManeuverKind::RampTake => "take the ramp",
            ManeuverKind::RoundaboutExit => "take the exit",
            ManeuverKind::Arrive => "arrive",
        };
        f.write_str(s)
    }
}

/// Relative direction of a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
    SlightLeft,
    SlightRight,
    SharpLeft,
    SharpRight,
    Straight,
    UTurn,
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnDirection::Left => "left",
            TurnDirection::Right => "right",
            TurnDirection::SlightLeft => "slight left",
            TurnDirection::SlightRight => "slight right",
            TurnDirection::SharpLeft => "sharp left",
            TurnDirection::SharpRight => "sharp right",
            TurnDirection::Straight => "straight",
            TurnDirection::UTurn => "U-turn",
        };
        f.write_str(s)
    }
}

/// An intersection the step passes through, with signal/sign flags the UI
/// renders as map markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub coordinate: Coordinate,
    pub traffic_signal: bool,
    pub stop_sign: bool,
}

/// Structured exit information at a junction or roundabout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JunctionExit {
    /// Signposted destinations (e.g. "Oakland / San Jose").
    pub destinations: Vec<String>,
    /// Exit codes (e.g. "24B").
    pub codes: Vec<String>,
    /// Exit names.
    pub names: Vec<String>,
}

/// The instruction associated with one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    /// Distance covered by the step, metres.
    pub distance_m: f64,
    /// Provider-supplied free-text instruction.
    pub instruction: String,
    /// Expected travel time for the step, seconds.
    pub expected_time_s: f64,
    /// Structured maneuver category, when the provider supplies one.
    pub kind: Option<ManeuverKind>,
    /// Relative direction, when applicable.
    pub direction: Option<TurnDirection>,
    /// Street the maneuver leads onto.
    pub street_name: Option<String>,
    /// Roundabout/numbered exit index.
    pub exit_index: Option<u32>,
    /// Structured junction exit info.
    pub exit: Option<JunctionExit>,
    /// Intersections crossed during the step.
    pub intersections: Vec<Intersection>,
    /// Names of roads leading out of the maneuver.
    pub road_names_out: Vec<String>,
}

impl Maneuver {
    /// Minimal maneuver with only distance, text, and time; structured
    /// fields empty.
    pub fn basic(distance_m: f64, instruction: impl Into<String>, expected_time_s: f64) -> Self {
        Self {
            distance_m,
            instruction: instruction.into(),
            expected_time_s,
            kind: None,
            direction: None,
            street_name: None,
            exit_index: None,
            exit: None,
            intersections: Vec::new(),
            road_names_out: Vec::new(),
        }
    }

    /// Set the structured kind/direction pair.
    pub fn with_kind(mut self, kind: ManeuverKind, direction: Option<TurnDirection>) -> Self {
        self.kind = Some(kind);
        self.direction = direction;
        self
    }

    /// Set the street the maneuver leads onto.
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street_name = Some(street.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(ManeuverKind::Turn.to_string(), "turn");
        assert_eq!(ManeuverKind::RampTake.to_string(), "take the ramp");
        assert_eq!(ManeuverKind::Arrive.to_string(), "arrive");
    }

    #[test]
    fn direction_display() {
        assert_eq!(TurnDirection::Left.to_string(), "left");
        assert_eq!(TurnDirection::SlightRight.to_string(), "slight right");
        assert_eq!(TurnDirection::UTurn.to_string(), "U-turn");
    }

    #[test]
    fn basic_maneuver_has_no_structure() {
        let m = Maneuver::basic(120.0, "Turn left", 15.0);
        assert_eq!(m.distance_m, 120.0);
        assert_eq!(m.instruction, "Turn left");
        assert!(m.kind.is_none());
        assert!(m.intersections.is_empty());
    }

    #[test]
    fn builder_sets_structure() {
        let m = Maneuver::basic(120.0, "Turn left onto Main St", 15.0)
            .with_kind(ManeuverKind::Turn, Some(TurnDirection::Left))
            .with_street("Main St");
        assert_eq!(m.kind, Some(ManeuverKind::Turn));
        assert_eq!(m.direction, Some(TurnDirection::Left));
        assert_eq!(m.street_name.as_deref(), Some("Main St"));
    }
}
