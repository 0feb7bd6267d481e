use std::f64::consts::TAU;

use chrono::{DateTime, Utc};

use super::error::PropagationError;
use super::frames::{
    ecef_to_geodetic, sidereal_angle, teme_to_ecef_position, teme_to_ecef_velocity,
};
use super::{Propagator, StateBatch};
use crate::elements::ElementSet;
use crate::kepler::{reduce_anomaly, true_anomaly_deg, KeplerSolver};

/// Earth gravitational parameter, km³/s².
pub const MU_EARTH: f64 = 398_600.4418;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Unperturbed Keplerian motion from the mean elements, rotated into the
/// Earth-fixed frame like the SGP4 output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoBodyPropagator {
    pub solver: KeplerSolver,
}

impl TwoBodyPropagator {
    pub fn new(solver: KeplerSolver) -> Self {
        Self { solver }
    }
}

impl Propagator for TwoBodyPropagator {
    fn name(&self) -> &'static str {
        "two_body"
    }

    fn propagate(
        &self,
        elements: &ElementSet,
        times: &[DateTime<Utc>],
    ) -> Result<StateBatch, PropagationError> {
        let raw = elements.elements();
        let e = raw.eccentricity;
        let n = raw.mean_motion * TAU / SECONDS_PER_DAY; // rad/s
        if !(0.0..1.0).contains(&e) || !n.is_finite() || n <= 0.0 {
            return Err(PropagationError::NotElliptic {
                eccentricity: e,
                mean_motion: raw.mean_motion,
            });
        }

        let a = (MU_EARTH / (n * n)).cbrt();
        let p = a * (1.0 - e * e);
        let epoch = elements.epoch();
        let m0 = raw.mean_anomaly.to_radians();

        let mean_anomaly: Vec<f64> = times
            .iter()
            .map(|t| reduce_anomaly(m0 + n * seconds_between(epoch, *t)))
            .collect();
        let solution = self.solver.solve(&mean_anomaly, e);
        if !solution.converged {
            log::warn!(
                "{}: Kepler solve stopped after {} iterations",
                elements.name(),
                solution.iterations
            );
        }

        let rotation = perifocal_to_inertial(
            raw.right_ascension.to_radians(),
            raw.inclination.to_radians(),
            raw.argument_of_perigee.to_radians(),
        );
        let v_scale = (MU_EARTH / p).sqrt();

        let mut batch = StateBatch::with_capacity(times.len());
        for (&timestamp, &ecc_anomaly) in times.iter().zip(&solution.eccentric_anomaly) {
            let nu = true_anomaly_deg(ecc_anomaly, e).to_radians();
            let r = a * (1.0 - e * ecc_anomaly.cos());

            let pos_pf = [r * nu.cos(), r * nu.sin(), 0.0];
            let vel_pf = [-v_scale * nu.sin(), v_scale * (e + nu.cos()), 0.0];
            let pos_inertial = apply(&rotation, pos_pf);
            let vel_inertial = apply(&rotation, vel_pf);

            let gmst = sidereal_angle(timestamp);
            let position = teme_to_ecef_position(pos_inertial, gmst);
            let velocity = teme_to_ecef_velocity(pos_inertial, vel_inertial, gmst);
            batch.push(ecef_to_geodetic(position), velocity);
        }

        Ok(batch)
    }
}

pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Rz(Ω)·Rx(i)·Rz(ω), row major.
fn perifocal_to_inertial(raan: f64, inc: f64, argp: f64) -> [[f64; 3]; 3] {
    let (so, co) = raan.sin_cos();
    let (si, ci) = inc.sin_cos();
    let (sw, cw) = argp.sin_cos();
    [
        [co * cw - so * sw * ci, -co * sw - so * cw * ci, so * si],
        [so * cw + co * sw * ci, -so * sw + co * cw * ci, -co * si],
        [sw * si, cw * si, ci],
    ]
}

fn apply(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
