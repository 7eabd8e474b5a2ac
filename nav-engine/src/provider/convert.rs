//! Conversion from wire DTOs to validated domain types.

use std::sync::Arc;

use crate::geo::Coordinate;
use crate::model::{
    Intersection, JunctionExit, Leg, Maneuver, ManeuverKind, ModelError, Route, Step,
    TurnDirection,
};

use super::types::{IntersectionDto, ManeuverDto, RouteDto, StepDto};

/// Errors converting provider responses into domain types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConvertError {
    /// Route had no legs, or a leg had no steps
    #[error("route contained no usable legs")]
    NoLegs,

    /// Model invariant violated by provider data
    #[error("invalid provider geometry: {0}")]
    InvalidGeometry(#[from] ModelError),
}

fn coordinate(lon_lat: [f64; 2]) -> Coordinate {
    // Wire order is [lon, lat].
    Coordinate::new(lon_lat[1], lon_lat[0])
}

fn maneuver_kind(kind: &str) -> Option<ManeuverKind> {
    match kind {
        "depart" => Some(ManeuverKind::Depart),
        "turn" | "end of road" => Some(ManeuverKind::Turn),
        "merge" => Some(ManeuverKind::Merge),
        "continue" | "new name" => Some(ManeuverKind::Continue),
        "fork" => Some(ManeuverKind::ForkTake),
        "on ramp" | "off ramp" => Some(ManeuverKind::RampTake),
        "roundabout" | "rotary" | "exit roundabout" | "exit rotary" => {
            Some(ManeuverKind::RoundaboutExit)
        }
        "arrive" => Some(ManeuverKind::Arrive),
        _ => None,
    }
}

fn turn_direction(modifier: &str) -> Option<TurnDirection> {
    match modifier {
        "left" => Some(TurnDirection::Left),
        "right" => Some(TurnDirection::Right),
        "slight left" => Some(TurnDirection::SlightLeft),
        "slight right" => Some(TurnDirection::SlightRight),
        "sharp left" => Some(TurnDirection::SharpLeft),
        "sharp right" => Some(TurnDirection::SharpRight),
        "straight" => Some(TurnDirection::Straight),
        "uturn" => Some(TurnDirection::UTurn),
        _ => None,
    }
}

fn convert_intersection(dto: &IntersectionDto) -> Intersection {
    Intersection {
        coordinate: coordinate(dto.location),
        traffic_signal: dto.classes.iter().any(|c| c == "traffic_signal"),
        stop_sign: dto.classes.iter().any(|c| c == "stop_sign"),
    }
}

fn split_signpost(field: &Option<String>) -> Vec<String> {
    field
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn convert_maneuver(step: &StepDto) -> Maneuver {
    let ManeuverDto {
        kind,
        modifier,
        exit,
        instruction,
        ..
    } = &step.maneuver;

    let destinations = split_signpost(&step.destinations);
    let exit_codes = split_signpost(&step.exits);

    let exit_info = if destinations.is_empty() && exit_codes.is_empty() {
        None
    } else {
        Some(JunctionExit {
            destinations,
            codes: exit_codes,
            names: Vec::new(),
        })
    };

    Maneuver {
        distance_m: step.distance,
        instruction: instruction.clone().unwrap_or_default(),
        expected_time_s: step.duration,
        kind: maneuver_kind(kind),
        direction: modifier.as_deref().and_then(turn_direction),
        street_name: step.name.clone().filter(|n| !n.is_empty()),
        exit_index: *exit,
        exit: exit_info,
        intersections: step.intersections.iter().map(convert_intersection).collect(),
        road_names_out: step.name.clone().filter(|n| !n.is_empty()).into_iter().collect(),
    }
}

/// Convert one wire step. A step with empty geometry falls back to the
/// maneuver location for both endpoints.
pub(super) fn convert_step(dto: &StepDto) -> Result<Step, ConvertError> {
    let maneuver = convert_maneuver(dto);
    let shape: Vec<Coordinate> = dto.geometry.coordinates.iter().map(|c| coordinate(*c)).collect();

    if shape.is_empty() {
        let point = coordinate(dto.maneuver.location);
        return Ok(Step::new(point, point, Vec::new(), maneuver)?);
    }

    Ok(Step::from_shape(shape, maneuver)?)
}

/// Convert a full wire route, preserving the provider's leg boundaries and
/// its aggregate distance/duration.
pub fn convert_route(dto: &RouteDto) -> Result<Route, ConvertError> {
    let mut legs = Vec::with_capacity(dto.legs.len());

    for leg in &dto.legs {
        let steps = leg
            .steps
            .iter()
            .map(|s| convert_step(s).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        legs.push(Arc::new(Leg::new(steps).map_err(|_| ConvertError::NoLegs)?));
    }

    Route::new(legs, dto.distance, dto.duration).map_err(|_| ConvertError::NoLegs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::GeometryDto;

    fn step_dto(coords: Vec<[f64; 2]>, kind: &str, modifier: Option<&str>) -> StepDto {
        let location = coords.first().copied().unwrap_or([0.0, 0.0]);
        StepDto {
            distance: 100.0,
            duration: 10.0,
            name: Some("Main St".into()),
            maneuver: ManeuverDto {
                kind: kind.into(),
                modifier: modifier.map(String::from),
                exit: None,
                location,
                instruction: None,
            },
            geometry: GeometryDto {
                coordinates: coords,
            },
            intersections: vec![],
            destinations: None,
            exits: None,
        }
    }

    #[test]
    fn converts_lon_lat_order() {
        let step = convert_step(&step_dto(
            vec![[-122.42, 37.77], [-122.41, 37.78]],
            "depart",
            None,
        ))
        .unwrap();

        assert_eq!(step.start_coordinate(), Coordinate::new(37.77, -122.42));
        assert_eq!(step.end_coordinate(), Coordinate::new(37.78, -122.41));
    }

    #[test]
    fn maps_kind_and_modifier() {
        let step = convert_step(&step_dto(
            vec![[0.0, 0.0], [0.1, 0.1]],
            "turn",
            Some("slight left"),
        ))
        .unwrap();

        assert_eq!(step.maneuver().kind, Some(ManeuverKind::Turn));
        assert_eq!(step.maneuver().direction, Some(TurnDirection::SlightLeft));
        assert_eq!(step.maneuver().street_name.as_deref(), Some("Main St"));
    }

    #[test]
    fn unknown_kind_becomes_unstructured() {
        let step = convert_step(&step_dto(
            vec![[0.0, 0.0], [0.1, 0.1]],
            "notification",
            None,
        ))
        .unwrap();
        assert!(step.maneuver().kind.is_none());
    }

    #[test]
    fn empty_geometry_uses_maneuver_location() {
        let mut dto = step_dto(vec![], "arrive", None);
        dto.maneuver.location = [-122.4, 37.7];
        let step = convert_step(&dto).unwrap();

        assert!(step.shape().is_empty());
        assert_eq!(step.start_coordinate(), Coordinate::new(37.7, -122.4));
        assert_eq!(step.end_coordinate(), step.start_coordinate());
    }

    #[test]
    fn intersections_flags_from_classes() {
        let mut dto = step_dto(vec![[0.0, 0.0], [0.1, 0.1]], "turn", Some("left"));
        dto.intersections = vec![
            IntersectionDto {
                location: [0.05, 0.05],
                classes: vec!["traffic_signal".into()],
            },
            IntersectionDto {
                location: [0.07, 0.07],
                classes: vec!["stop_sign".into()],
            },
        ];

        let step = convert_step(&dto).unwrap();
        let ix = &step.maneuver().intersections;
        assert!(ix[0].traffic_signal && !ix[0].stop_sign);
        assert!(!ix[1].traffic_signal && ix[1].stop_sign);
    }

    #[test]
    fn signpost_fields_become_exit_info() {
        let mut dto = step_dto(vec![[0.0, 0.0], [0.1, 0.1]], "off ramp", Some("right"));
        dto.destinations = Some("Oakland, San Jose".into());
        dto.exits = Some("24B".into());

        let step = convert_step(&dto).unwrap();
        let exit = step.maneuver().exit.as_ref().unwrap();
        assert_eq!(exit.destinations, vec!["Oakland", "San Jose"]);
        assert_eq!(exit.codes, vec!["24B"]);
    }

    #[test]
    fn route_conversion_preserves_leg_boundaries_and_totals() {
        let dto = RouteDto {
            distance: 2000.0,
            duration: 300.0,
            legs: vec![
                crate::provider::types::LegDto {
                    distance: 1000.0,
                    duration: 150.0,
                    steps: vec![step_dto(vec![[0.0, 0.0], [0.1, 0.0]], "depart", None)],
                },
                crate::provider::types::LegDto {
                    distance: 1000.0,
                    duration: 150.0,
                    steps: vec![step_dto(vec![[0.1, 0.0], [0.2, 0.0]], "arrive", None)],
                },
            ],
        };

        let route = convert_route(&dto).unwrap();
        assert_eq!(route.legs().len(), 2);
        assert_eq!(route.total_distance_m(), 2000.0);
        assert_eq!(route.total_time_s(), 300.0);
    }

    #[test]
    fn empty_legs_rejected() {
        let dto = RouteDto {
            distance: 0.0,
            duration: 0.0,
            legs: vec![],
        };
        assert!(matches!(convert_route(&dto), Err(ConvertError::NoLegs)));
    }
}
