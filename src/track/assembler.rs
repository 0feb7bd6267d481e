use super::error::TrackError;
use super::kinematics::KinematicsDeriver;
use super::line::line_from_points;
use super::sample::{LineTrack, PointTrack};
use super::time_grid::TimeGrid;
use crate::elements::ElementSet;
use crate::propagation::Propagator;

/// Runs a propagator and the kinematics derivation over a time grid.
pub struct TrackAssembler<P> {
    propagator: P,
    deriver: KinematicsDeriver,
}

impl<P: Propagator> TrackAssembler<P> {
    pub fn new(propagator: P, deriver: KinematicsDeriver) -> Self {
        Self {
            propagator,
            deriver,
        }
    }

    pub fn propagator(&self) -> &P {
        &self.propagator
    }

    /// One point per grid instant, in grid order.
    pub fn build_track(
        &self,
        elements: &ElementSet,
        grid: &TimeGrid,
    ) -> Result<PointTrack, TrackError> {
        let times = grid.instants();
        let states = self.propagator.propagate(elements, times)?;
        let points = self.deriver.derive(elements, times, &states)?;

        log::debug!(
            "{}: {} points from {} back-end",
            elements.name(),
            points.len(),
            self.propagator.name()
        );
        Ok(points)
    }

    pub fn build_line(&self, points: &PointTrack) -> Result<LineTrack, TrackError> {
        line_from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::Sgp4Propagator;
    use crate::track::GridBoundary;
    use chrono::{Duration, TimeZone, Utc};

    const L1: &str = "1 25544U 98067A   25087.50000000  .00016717  00000-0  30147-3 0  9997";
    const L2: &str = "2 25544  51.6386 123.4567 0004123  45.6789 314.4567 15.49512345499997";

    #[test]
    fn track_follows_grid_order() {
        let set = ElementSet::from_tle(None, L1, L2).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 3, 28, 6, 0, 0).unwrap();
        let grid =
            TimeGrid::new(start, Duration::hours(3), Duration::seconds(30), GridBoundary::Inclusive)
                .unwrap();
        let assembler = TrackAssembler::new(Sgp4Propagator, KinematicsDeriver::default());

        let points = assembler.build_track(&set, &grid).unwrap();
        assert_eq!(points.len(), grid.len());
        for (point, t) in points.iter().zip(grid.instants()) {
            assert_eq!(point.time, *t);
        }

        // three hours of LEO wraps the globe at least once
        let line = assembler.build_line(&points).unwrap();
        assert!(line.len() >= 2);
        let vertices: usize = line.iter().map(Vec::len).sum();
        assert_eq!(vertices, points.len() + 2 * (line.len() - 1));
    }

    #[test]
    fn empty_grid_gives_empty_track_and_no_line() {
        let set = ElementSet::from_tle(None, L1, L2).unwrap();
        let grid = TimeGrid::new(
            set.epoch(),
            Duration::zero(),
            Duration::minutes(1),
            GridBoundary::Exclusive,
        )
        .unwrap();
        let assembler = TrackAssembler::new(Sgp4Propagator, KinematicsDeriver::default());
        let points = assembler.build_track(&set, &grid).unwrap();
        assert!(points.is_empty());
        assert!(matches!(assembler.build_line(&points), Err(TrackError::EmptyTrack)));
    }
}
