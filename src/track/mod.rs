mod assembler;
mod error;
mod kinematics;
mod line;
mod sample;
mod time_grid;

pub use assembler::TrackAssembler;
pub use error::TrackError;
pub use kinematics::{local_motion, KinematicsDeriver, LocalMotion};
pub use line::{build_line, line_from_points};
pub use sample::{LineSegment, LineTrack, PointTrack, TrackPoint};
pub use time_grid::{GridBoundary, TimeGrid};
