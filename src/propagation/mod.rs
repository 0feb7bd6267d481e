mod error;
mod frames;
mod sgp4_backend;
mod two_body;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::elements::ElementSet;

pub use error::PropagationError;
pub use frames::{
    ecef_to_enu, ecef_to_geodetic, sidereal_angle, teme_to_ecef_position, teme_to_ecef_velocity,
    Geodetic, EARTH_ROTATION_RAD_S,
};
pub use sgp4_backend::Sgp4Propagator;
pub use two_body::{TwoBodyPropagator, MU_EARTH};

pub(crate) use two_body::seconds_between;

/// Orbits with a longer period than this are deep-space in the SGP4 sense.
pub const DEEP_SPACE_PERIOD_MINUTES: f64 = 225.0;

/// Positions and Earth-relative velocities for a batch of instants, index
/// aligned with the instants they were computed for.
#[derive(Debug, Clone, Default)]
pub struct StateBatch {
    pub positions: Vec<Geodetic>,
    /// ECEF velocity, km/s.
    pub velocities: Vec<[f64; 3]>,
}

impl StateBatch {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            velocities: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, position: Geodetic, velocity: [f64; 3]) {
        self.positions.push(position);
        self.velocities.push(velocity);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An orbit model producing geodetic positions and ECEF velocities.
pub trait Propagator {
    fn name(&self) -> &'static str;

    fn propagate(
        &self,
        elements: &ElementSet,
        times: &[DateTime<Utc>],
    ) -> Result<StateBatch, PropagationError>;
}

impl<P: Propagator + ?Sized> Propagator for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn propagate(
        &self,
        elements: &ElementSet,
        times: &[DateTime<Utc>],
    ) -> Result<StateBatch, PropagationError> {
        (**self).propagate(elements, times)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, strum_macros::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackendPolicy {
    #[default]
    Sgp4,
    TwoBody,
    /// Two-body for orbits slower than the threshold, SGP4 otherwise.
    ByPeriod {
        #[serde(default = "default_deep_space_period")]
        deep_space_period_minutes: f64,
    },
}

fn default_deep_space_period() -> f64 {
    DEEP_SPACE_PERIOD_MINUTES
}

/// Picks a back-end per element set according to a [`BackendPolicy`].
#[derive(Debug, Clone, Default)]
pub struct PolicyPropagator {
    policy: BackendPolicy,
    sgp4: Sgp4Propagator,
    two_body: TwoBodyPropagator,
}

impl PolicyPropagator {
    pub fn new(policy: BackendPolicy, two_body: TwoBodyPropagator) -> Self {
        Self {
            policy,
            sgp4: Sgp4Propagator,
            two_body,
        }
    }

    pub fn select(&self, elements: &ElementSet) -> &dyn Propagator {
        match self.policy {
            BackendPolicy::Sgp4 => &self.sgp4,
            BackendPolicy::TwoBody => &self.two_body,
            BackendPolicy::ByPeriod {
                deep_space_period_minutes,
            } => {
                if elements.period_minutes() > deep_space_period_minutes {
                    &self.two_body
                } else {
                    &self.sgp4
                }
            }
        }
    }
}

impl Propagator for PolicyPropagator {
    fn name(&self) -> &'static str {
        "policy"
    }

    fn propagate(
        &self,
        elements: &ElementSet,
        times: &[DateTime<Utc>],
    ) -> Result<StateBatch, PropagationError> {
        let backend = self.select(elements);
        log::debug!(
            "{}: period {:.1} min, {} back-end ({} policy)",
            elements.name(),
            elements.period_minutes(),
            backend.name(),
            self.policy
        );
        backend.propagate(elements, times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_L1: &str = "1 25544U 98067A   25087.50000000  .00016717  00000-0  30147-3 0  9997";
    const ISS_L2: &str = "2 25544  51.6386 123.4567 0004123  45.6789 314.4567 15.49512345499997";
    const GPS_L1: &str = "1 28474U 04045A   25087.00000000 -.00000035  00000-0  00000+0 0  9998";
    const GPS_L2: &str = "2 28474  55.1532 229.1234 0123456 270.1234  89.5678  2.00561234150003";

    #[test]
    fn by_period_selects_two_body_for_deep_space() {
        let iss = ElementSet::from_tle(None, ISS_L1, ISS_L2).unwrap();
        let gps = ElementSet::from_tle(None, GPS_L1, GPS_L2).unwrap();
        let policy = PolicyPropagator::new(
            BackendPolicy::ByPeriod {
                deep_space_period_minutes: DEEP_SPACE_PERIOD_MINUTES,
            },
            TwoBodyPropagator::default(),
        );
        assert_eq!(policy.select(&iss).name(), "sgp4");
        assert_eq!(policy.select(&gps).name(), "two_body");

        let fixed = PolicyPropagator::default();
        assert_eq!(fixed.select(&gps).name(), "sgp4");
    }

    #[test]
    fn policy_from_yaml() {
        let policy: BackendPolicy = serde_yaml::from_str("kind: by_period").unwrap();
        assert_eq!(
            policy,
            BackendPolicy::ByPeriod {
                deep_space_period_minutes: 225.0
            }
        );
        let policy: BackendPolicy = serde_yaml::from_str("kind: two_body").unwrap();
        assert_eq!(policy, BackendPolicy::TwoBody);
        assert_eq!(policy.to_string(), "two_body");
    }
}
