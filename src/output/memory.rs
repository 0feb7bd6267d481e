use std::collections::HashMap;
use std::path::Path;

use super::{OutputError, TrackSaver};
use crate::track::{LineTrack, PointTrack};

/// Keeps saved tracks by layer name, replacing earlier layers of the same name.
#[derive(Debug, Default)]
pub struct MemorySaver {
    points: HashMap<String, PointTrack>,
    lines: HashMap<String, LineTrack>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self, layer: &str) -> Option<&PointTrack> {
        self.points.get(layer)
    }

    pub fn lines(&self, layer: &str) -> Option<&LineTrack> {
        self.lines.get(layer)
    }

    pub fn layer_count(&self) -> usize {
        self.points.len() + self.lines.len()
    }
}

fn layer_name(target: &Path) -> String {
    target.to_string_lossy().into_owned()
}

impl TrackSaver for MemorySaver {
    fn save_points(&mut self, points: &PointTrack, target: &Path) -> Result<(), OutputError> {
        self.points.insert(layer_name(target), points.clone());
        Ok(())
    }

    fn save_lines(&mut self, lines: &LineTrack, target: &Path) -> Result<(), OutputError> {
        self.lines.insert(layer_name(target), lines.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_replaced_by_name() {
        let mut saver = MemorySaver::new();
        saver.save_lines(&vec![vec![(0.0, 0.0)]], Path::new("track")).unwrap();
        saver.save_lines(&vec![vec![(1.0, 1.0)], vec![(2.0, 2.0)]], Path::new("track")).unwrap();
        assert_eq!(saver.lines("track").map(Vec::len), Some(2));
        assert!(saver.points("track").is_none());
        assert_eq!(saver.layer_count(), 1);
    }
}
