use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::TrackError;

pub const MAX_INSTANTS: i64 = 10_000_000;

/// Whether the window end is itself a grid instant when the step divides
/// the duration (`t <= end`) or not (`t < end`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GridBoundary {
    #[default]
    Inclusive,
    Exclusive,
}

/// Strictly increasing instants `start + i·step`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    instants: Vec<DateTime<Utc>>,
    step: Duration,
}

impl TimeGrid {
    pub fn new(
        start: DateTime<Utc>,
        duration: Duration,
        step: Duration,
        boundary: GridBoundary,
    ) -> Result<Self, TrackError> {
        if step <= Duration::zero() {
            return Err(TrackError::InvalidGrid(format!("step must be positive, got {step}")));
        }
        if duration < Duration::zero() {
            return Err(TrackError::InvalidGrid(format!(
                "duration must not be negative, got {duration}"
            )));
        }

        let too_long = || TrackError::InvalidGrid("duration out of range".into());
        let duration_us = duration.num_microseconds().ok_or_else(too_long)?;
        let step_us = step.num_microseconds().ok_or_else(too_long)?;
        if step_us == 0 {
            return Err(TrackError::InvalidGrid("step is below one microsecond".into()));
        }

        let whole = duration_us / step_us;
        let count = match boundary {
            GridBoundary::Inclusive => whole + 1,
            GridBoundary::Exclusive if duration_us % step_us == 0 => whole,
            GridBoundary::Exclusive => whole + 1,
        };

        if count > MAX_INSTANTS {
            return Err(TrackError::InvalidGrid(format!(
                "{count} instants exceed the limit of {MAX_INSTANTS}"
            )));
        }

        // index based so rounding does not accumulate over long windows
        let instants = (0..count)
            .map(|i| start.checked_add_signed(Duration::microseconds(step_us * i)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| TrackError::InvalidGrid("window end is out of range".into()))?;

        Ok(Self { instants, step })
    }

    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.instants
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.instants.first().copied()
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }
}
