use super::error::TrackError;
use super::sample::{LineSegment, LineTrack, TrackPoint};

/// Split a (lon, lat) sequence into polyline segments at antimeridian
/// crossings.
///
/// A jump of more than 180° in longitude between consecutive vertices is a
/// wrap. The crossing latitude is interpolated linearly; the closing segment
/// ends exactly at ±180° and the next one starts at the opposite edge.
pub fn build_line(points: &[(f64, f64)]) -> Result<LineTrack, TrackError> {
    let (&first, rest) = points.split_first().ok_or(TrackError::EmptyTrack)?;

    let mut segments = Vec::new();
    let mut current: LineSegment = vec![first];
    let mut p1 = first;

    for &p2 in rest {
        let delta_lon = p2.0 - p1.0;

        if delta_lon.abs() <= 180.0 {
            current.push(p2);
        } else if delta_lon < -180.0 {
            // eastbound through +180
            let lat = crossing_latitude(p1, (p2.0 + 360.0, p2.1), 180.0);
            current.push((180.0, lat));
            segments.push(std::mem::replace(&mut current, vec![(-180.0, lat), p2]));
        } else {
            // westbound through -180
            let lat = crossing_latitude(p1, (p2.0 - 360.0, p2.1), -180.0);
            current.push((-180.0, lat));
            segments.push(std::mem::replace(&mut current, vec![(180.0, lat), p2]));
        }

        p1 = p2;
    }

    segments.push(current);
    Ok(segments)
}

/// Latitude where the segment from `p1` to the unwrapped `p2` meets `edge`.
/// Opposite edges of the same meridian have no span and keep `p1`'s latitude.
fn crossing_latitude(p1: (f64, f64), p2: (f64, f64), edge: f64) -> f64 {
    let span = p2.0 - p1.0;
    if span == 0.0 {
        return p1.1;
    }
    p1.1 + (edge - p1.0) / span * (p2.1 - p1.1)
}

/// [`build_line`] over the (lon, lat) projection of a point track.
pub fn line_from_points(points: &[TrackPoint]) -> Result<LineTrack, TrackError> {
    let lon_lat: Vec<(f64, f64)> = points.iter().map(TrackPoint::lon_lat).collect();
    build_line(&lon_lat)
}
