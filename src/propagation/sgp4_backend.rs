use chrono::{DateTime, Utc};
use sgp4::Constants;

use super::error::PropagationError;
use super::frames::{
    ecef_to_geodetic, sidereal_angle, teme_to_ecef_position, teme_to_ecef_velocity,
};
use super::{Propagator, StateBatch};
use crate::elements::ElementSet;

/// SGP4/SDP4 through the `sgp4` crate. Deep-space orbits are handled by the
/// model itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn name(&self) -> &'static str {
        "sgp4"
    }

    fn propagate(
        &self,
        elements: &ElementSet,
        times: &[DateTime<Utc>],
    ) -> Result<StateBatch, PropagationError> {
        let constants = Constants::from_elements(elements.elements())?;
        let mut batch = StateBatch::with_capacity(times.len());

        for &timestamp in times {
            let minutes = elements
                .elements()
                .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
                .map_err(|e| PropagationError::TimeOutOfRange {
                    time: timestamp,
                    message: e.to_string(),
                })?;

            let prediction = constants
                .propagate(minutes)
                .map_err(|e| PropagationError::Model {
                    time: timestamp,
                    message: e.to_string(),
                })?;

            let gmst = sidereal_angle(timestamp);
            let position = teme_to_ecef_position(prediction.position, gmst);
            let velocity = teme_to_ecef_velocity(prediction.position, prediction.velocity, gmst);

            batch.push(ecef_to_geodetic(position), velocity);
        }

        Ok(batch)
    }
}
