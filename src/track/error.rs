use thiserror::Error;

use crate::propagation::PropagationError;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track has no points")]
    EmptyTrack,
    #[error("invalid time grid: {0}")]
    InvalidGrid(String),
    #[error("state batch mismatch: {times} times, {positions} positions, {velocities} velocities")]
    LengthMismatch {
        times: usize,
        positions: usize,
        velocities: usize,
    },
    #[error("propagation error: {0}")]
    Propagation(#[from] PropagationError),
}
