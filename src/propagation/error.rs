use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("elements rejected by the orbit model: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("{time} is out of range for these elements: {message}")]
    TimeOutOfRange { time: DateTime<Utc>, message: String },
    #[error("propagation failed at {time}: {message}")]
    Model { time: DateTime<Utc>, message: String },
    #[error("orbit is not elliptic (e = {eccentricity}, n = {mean_motion} rev/day)")]
    NotElliptic { eccentricity: f64, mean_motion: f64 },
}
