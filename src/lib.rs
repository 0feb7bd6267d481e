//! Satellite ground tracks from mean orbital elements.
//!
//! An [`ElementSet`] (TLE or OMM) is propagated over a [`TimeGrid`] into a
//! sequence of [`TrackPoint`]s and a polyline split at the antimeridian.

pub mod config;
pub mod elements;
pub mod engine;
pub mod kepler;
pub mod output;
pub mod propagation;
pub mod track;

pub use elements::{ElementFormat, ElementSet, ElementSetError, RawElements};
pub use engine::{EngineConfig, EngineError, OrbitalEngine};
pub use kepler::{KeplerSolution, KeplerSolver};
pub use propagation::{
    BackendPolicy, Geodetic, PolicyPropagator, PropagationError, Propagator, Sgp4Propagator,
    StateBatch, TwoBodyPropagator,
};
pub use track::{GridBoundary, LineTrack, PointTrack, TimeGrid, TrackPoint};
