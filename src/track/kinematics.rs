use chrono::{DateTime, Utc};

use super::error::TrackError;
use super::sample::{PointTrack, TrackPoint};
use crate::elements::ElementSet;
use crate::kepler::{reduce_anomaly, true_anomaly_deg, wrap_360, KeplerSolver};
use crate::propagation::{ecef_to_enu, seconds_between, Geodetic, StateBatch};

const DEG_PER_REV_DAY_TO_DEG_PER_S: f64 = 360.0 / 86_400.0;

/// Local velocity geometry at one sub-satellite point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalMotion {
    pub speed_km_s: f64,
    pub azimuth_deg: f64,
    pub trajectory_arc_deg: f64,
}

/// Speed, heading and climb angle of an ECEF velocity seen from the local
/// East-North-Up frame at `position`.
pub fn local_motion(position: &Geodetic, velocity: [f64; 3]) -> LocalMotion {
    let (east, north, up) = ecef_to_enu(velocity, position.lat_rad(), position.lon_rad());
    let [vx, vy, vz] = velocity;

    LocalMotion {
        speed_km_s: (vx * vx + vy * vy + vz * vz).sqrt(),
        azimuth_deg: wrap_360(east.atan2(north).to_degrees()),
        trajectory_arc_deg: up.atan2(east.hypot(north)).to_degrees(),
    }
}

/// Turns propagated states into [`TrackPoint`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicsDeriver {
    pub solver: KeplerSolver,
    /// Round every numeric field to this many decimals.
    pub round_decimals: Option<u32>,
}

impl KinematicsDeriver {
    pub fn new(solver: KeplerSolver, round_decimals: Option<u32>) -> Self {
        Self {
            solver,
            round_decimals,
        }
    }

    pub fn derive(
        &self,
        elements: &ElementSet,
        times: &[DateTime<Utc>],
        states: &StateBatch,
    ) -> Result<PointTrack, TrackError> {
        if states.positions.len() != times.len() || states.velocities.len() != times.len() {
            return Err(TrackError::LengthMismatch {
                times: times.len(),
                positions: states.positions.len(),
                velocities: states.velocities.len(),
            });
        }

        let true_anomaly = self.true_anomalies(elements, times);
        let inclination = elements.inclination_deg();

        let points = times
            .iter()
            .zip(&states.positions)
            .zip(&states.velocities)
            .zip(true_anomaly)
            .map(|(((&time, position), &velocity), nu)| {
                let motion = local_motion(position, velocity);
                TrackPoint {
                    time,
                    longitude_deg: self.round(position.longitude_deg),
                    latitude_deg: self.round(position.latitude_deg),
                    altitude_km: self.round(position.altitude_km),
                    speed_km_s: self.round(motion.speed_km_s),
                    azimuth_deg: wrap_360(self.round(motion.azimuth_deg)),
                    trajectory_arc_deg: self.round(motion.trajectory_arc_deg),
                    true_anomaly_deg: wrap_360(self.round(nu)),
                    inclination_deg: inclination,
                }
            })
            .collect();

        Ok(points)
    }

    /// True anomaly in degrees at each instant, from the mean anomaly
    /// advanced at the element set's mean motion.
    pub fn true_anomalies(&self, elements: &ElementSet, times: &[DateTime<Utc>]) -> Vec<f64> {
        let epoch = elements.epoch();
        let m0 = elements.mean_anomaly_deg();
        let rate = elements.mean_motion() * DEG_PER_REV_DAY_TO_DEG_PER_S;
        let e = elements.eccentricity();

        let mean_anomaly: Vec<f64> = times
            .iter()
            .map(|t| reduce_anomaly((m0 + rate * seconds_between(epoch, *t)).to_radians()))
            .collect();

        let solution = self.solver.solve(&mean_anomaly, e);
        if !solution.converged {
            log::warn!(
                "{}: Kepler solve did not reach {:e} within {} iterations, using last estimate",
                elements.name(),
                self.solver.tolerance,
                solution.iterations
            );
        }

        solution
            .eccentric_anomaly
            .iter()
            .map(|&ea| true_anomaly_deg(ea, e))
            .collect()
    }

    fn round(&self, value: f64) -> f64 {
        match self.round_decimals {
            Some(decimals) => {
                let scale = 10f64.powi(decimals as i32);
                (value * scale).round() / scale
            }
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;

    const L1: &str = "1 25544U 98067A   25087.50000000  .00016717  00000-0  30147-3 0  9997";
    const L2: &str = "2 25544  51.6386 123.4567 0004123  45.6789 314.4567 15.49512345499997";

    fn at(lon: f64, lat: f64) -> Geodetic {
        Geodetic {
            longitude_deg: lon,
            latitude_deg: lat,
            altitude_km: 400.0,
        }
    }

    #[test]
    fn heading_east_at_equator() {
        let motion = local_motion(&at(0.0, 0.0), [0.0, 7.0, 0.0]);
        assert_relative_eq!(motion.azimuth_deg, 90.0);
        assert_relative_eq!(motion.trajectory_arc_deg, 0.0);
        assert_relative_eq!(motion.speed_km_s, 7.0);
    }

    #[test]
    fn heading_north_east_and_climbing() {
        // at (90°E, 0°) east is -x, north is +z, up is +y
        let motion = local_motion(&at(90.0, 0.0), [-1.0, 1.0, 1.0]);
        assert_relative_eq!(motion.azimuth_deg, 45.0, epsilon = 1e-9);
        assert_relative_eq!(
            motion.trajectory_arc_deg,
            1f64.atan2(2f64.sqrt()).to_degrees(),
            epsilon = 1e-9
        );
        assert_relative_eq!(motion.speed_km_s, 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn heading_west_is_270() {
        let motion = local_motion(&at(0.0, 0.0), [0.0, -7.0, 0.0]);
        assert_relative_eq!(motion.azimuth_deg, 270.0);
    }

    #[test]
    fn true_anomaly_at_epoch_and_one_period_later() {
        let set = ElementSet::from_tle(None, L1, L2).unwrap();
        let period = Duration::milliseconds((set.period_minutes() * 60_000.0).round() as i64);
        let times = [set.epoch(), set.epoch() + period];
        let nu = KinematicsDeriver::default().true_anomalies(&set, &times);

        // near-circular: true anomaly stays within a fraction of a degree of M
        assert!((nu[0] - 314.4567).abs() < 0.1, "nu {}", nu[0]);
        assert!((nu[1] - nu[0]).abs() < 1e-3);
    }

    #[test]
    fn mismatched_batch_is_rejected() {
        let set = ElementSet::from_tle(None, L1, L2).unwrap();
        let times = [set.epoch()];
        let result = KinematicsDeriver::default().derive(&set, &times, &StateBatch::default());
        assert!(matches!(result, Err(TrackError::LengthMismatch { times: 1, .. })));
    }

    #[test]
    fn rounding_keeps_ranges() {
        let set = ElementSet::from_tle(None, L1, L2).unwrap();
        // heading a hair west of north rounds up to 360
        let (lon, east) = (10f64.to_radians(), -1e-7);
        let mut states = StateBatch::default();
        states.push(at(10.0, 0.0), [-lon.sin() * east, lon.cos() * east, 7.0]);
        let deriver = KinematicsDeriver::new(KeplerSolver::default(), Some(4));
        let points = deriver.derive(&set, &[set.epoch()], &states).unwrap();
        assert_eq!(points[0].azimuth_deg, 0.0);
        assert_eq!(points[0].inclination_deg, 51.6386);
    }
}
