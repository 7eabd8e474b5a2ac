//! Spherical bearing helpers.

use super::Coordinate;

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let n = deg % 360.0;
    if n < 0.0 { n + 360.0 } else { n }
}

/// Initial great-circle bearing from `from` toward `to`, in degrees
/// normalized to `[0, 360)`.
///
/// Uses the standard spherical forward-azimuth formula.
pub fn initial_bearing_deg(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_deg(y.atan2(x).to_degrees())
}

/// Absolute angular difference between two headings, in `[0, 180]`.
pub fn heading_delta_deg(a: f64, b: f64) -> f64 {
    let d = (normalize_deg(a) - normalize_deg(b)).abs();
    if d > 180.0 { 360.0 - d } else { d }
}
