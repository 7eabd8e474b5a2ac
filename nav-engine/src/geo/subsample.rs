//! Coordinate-list subsampling for the persisted route encoding.

use super::Coordinate;

/// Maximum number of coordinates persisted per leg.
pub const MAX_PERSISTED_POINTS: usize = 100;

/// Subsample `points` down to at most `max` entries.
///
/// Walks the input with a stride of `ceil((n + 1) / max)`, keeping the first
/// point by construction, then forces the last original coordinate to be
/// the final emitted point: if the buffer already holds `max` entries the
/// last sampled point is replaced, otherwise the point is appended. The
/// append can duplicate the final point when the stride already landed on
/// it; the encoding tolerates that.
///
/// Returns an empty vector for empty input or `max == 0`.
pub fn subsample(points: &[Coordinate], max: usize) -> Vec<Coordinate> {
    if points.is_empty() || max == 0 {
        return Vec::new();
    }

    let stride = (points.len() + 1).div_ceil(max);
    let mut sampled: Vec<Coordinate> = points.iter().step_by(stride).copied().collect();

    let last = points[points.len() - 1];
    if sampled.len() == max {
        sampled[max - 1] = last;
    } else {
        sampled.push(last);
    }

    sampled
}
