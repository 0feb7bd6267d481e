use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::{ElementSet, ElementSetError, RawElements};
use crate::kepler::{KeplerSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::propagation::{
    BackendPolicy, PolicyPropagator, PropagationError, Propagator, TwoBodyPropagator,
};
use crate::track::{
    GridBoundary, KinematicsDeriver, LineTrack, PointTrack, TimeGrid, TrackAssembler, TrackError,
};

const MICROS_PER_HOUR: f64 = 3.6e9;
const MICROS_PER_MINUTE: f64 = 6e7;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid element set: {0}")]
    InvalidElementSet(#[from] ElementSetError),
    #[error("propagation error: {0}")]
    Propagation(#[from] PropagationError),
    #[error("track has no points")]
    EmptyTrack,
    #[error("track error: {0}")]
    Track(TrackError),
}

impl From<TrackError> for EngineError {
    fn from(err: TrackError) -> Self {
        match err {
            TrackError::EmptyTrack => EngineError::EmptyTrack,
            TrackError::InvalidGrid(message) => EngineError::InvalidConfig(message),
            TrackError::Propagation(e) => EngineError::Propagation(e),
            other => EngineError::Track(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub boundary: GridBoundary,
    pub backend: BackendPolicy,
    pub kepler_tolerance: f64,
    pub kepler_max_iterations: usize,
    pub round_decimals: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            boundary: GridBoundary::default(),
            backend: BackendPolicy::default(),
            kepler_tolerance: DEFAULT_TOLERANCE,
            kepler_max_iterations: DEFAULT_MAX_ITERATIONS,
            round_decimals: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.kepler_tolerance.is_finite() || self.kepler_tolerance < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "kepler_tolerance must be a non-negative number, got {}",
                self.kepler_tolerance
            )));
        }
        if let BackendPolicy::ByPeriod {
            deep_space_period_minutes,
        } = self.backend
        {
            if deep_space_period_minutes.is_nan() || deep_space_period_minutes <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "deep_space_period_minutes must be positive, got {}",
                    deep_space_period_minutes
                )));
            }
        }
        Ok(())
    }

    pub fn kepler_solver(&self) -> KeplerSolver {
        KeplerSolver::new(self.kepler_tolerance, self.kepler_max_iterations)
    }
}

/// Entry point for computing one satellite's ground track over a window.
pub struct OrbitalEngine<P = PolicyPropagator> {
    config: EngineConfig,
    assembler: TrackAssembler<P>,
}

impl OrbitalEngine<PolicyPropagator> {
    pub fn new(config: EngineConfig) -> Self {
        let solver = config.kepler_solver();
        let propagator = PolicyPropagator::new(config.backend, TwoBodyPropagator::new(solver));
        Self::with_propagator(config, propagator)
    }
}

impl Default for OrbitalEngine<PolicyPropagator> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<P: Propagator> OrbitalEngine<P> {
    pub fn with_propagator(config: EngineConfig, propagator: P) -> Self {
        let deriver = KinematicsDeriver::new(config.kepler_solver(), config.round_decimals);
        Self {
            config,
            assembler: TrackAssembler::new(propagator, deriver),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn propagator(&self) -> &P {
        self.assembler.propagator()
    }

    /// Build the time grid for a window. Fails before any propagation when
    /// the duration or step is not strictly positive.
    pub fn time_grid(
        &self,
        start: DateTime<Utc>,
        duration_hours: f64,
        step_minutes: f64,
    ) -> Result<TimeGrid, EngineError> {
        self.config.validate()?;
        let duration = positive_duration("duration_hours", duration_hours, MICROS_PER_HOUR)?;
        let step = positive_duration("step_minutes", step_minutes, MICROS_PER_MINUTE)?;
        Ok(TimeGrid::new(start, duration, step, self.config.boundary)?)
    }

    /// Points and antimeridian-split line of `elements` from `start` over
    /// `duration_hours`, sampled every `step_minutes`.
    pub fn compute_track(
        &self,
        elements: &ElementSet,
        start: DateTime<Utc>,
        duration_hours: f64,
        step_minutes: f64,
    ) -> Result<(PointTrack, LineTrack), EngineError> {
        let grid = self.time_grid(start, duration_hours, step_minutes)?;
        self.track_over(elements, &grid)
    }

    /// As [`compute_track`](Self::compute_track), validating the window
    /// first and the raw elements second.
    pub fn compute_track_raw(
        &self,
        raw: &RawElements,
        start: DateTime<Utc>,
        duration_hours: f64,
        step_minutes: f64,
    ) -> Result<(PointTrack, LineTrack), EngineError> {
        let grid = self.time_grid(start, duration_hours, step_minutes)?;
        let elements = raw.parse()?;
        self.track_over(&elements, &grid)
    }

    fn track_over(
        &self,
        elements: &ElementSet,
        grid: &TimeGrid,
    ) -> Result<(PointTrack, LineTrack), EngineError> {
        log::debug!(
            "{}: {} instants from {:?} ({} boundary)",
            elements.name(),
            grid.len(),
            grid.start(),
            self.config.boundary
        );

        let points = self.assembler.build_track(elements, grid)?;
        let line = self.assembler.build_line(&points)?;

        log::info!(
            "{}: computed {} points, {} line segments",
            elements.name(),
            points.len(),
            line.len()
        );
        Ok((points, line))
    }
}

fn positive_duration(
    name: &str,
    value: f64,
    micros_per_unit: f64,
) -> Result<Duration, EngineError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    let micros = (value * micros_per_unit).round();
    if micros >= i64::MAX as f64 {
        return Err(EngineError::InvalidConfig(format!("{name} is too large: {value}")));
    }
    Ok(Duration::microseconds(micros as i64))
}
