use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kinematic state of the satellite at one grid instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub time: DateTime<Utc>,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_km: f64,
    /// Earth-relative speed.
    pub speed_km_s: f64,
    /// Heading of the ground velocity, clockwise from north.
    pub azimuth_deg: f64,
    /// Elevation of the velocity vector above the local horizontal.
    pub trajectory_arc_deg: f64,
    pub true_anomaly_deg: f64,
    pub inclination_deg: f64,
}

impl TrackPoint {
    pub fn lon_lat(&self) -> (f64, f64) {
        (self.longitude_deg, self.latitude_deg)
    }
}

/// One point per grid instant, in grid order.
pub type PointTrack = Vec<TrackPoint>;

/// (longitude, latitude) vertices of a polyline piece that does not cross
/// the antimeridian.
pub type LineSegment = Vec<(f64, f64)>;

pub type LineTrack = Vec<LineSegment>;
