use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::{create_parent, is_stdout, OutputError, TrackSaver};
use crate::track::{LineTrack, PointTrack, TrackPoint};

/// Writes tracks as GeoJSON FeatureCollections in WGS84 lon/lat. A target
/// of `-` goes to standard output, one collection per line unless pretty.
#[derive(Debug, Default, Clone)]
pub struct GeoJsonSaver {
    pub pretty: bool,
}

impl GeoJsonSaver {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn points_collection(points: &PointTrack) -> Value {
        let features: Vec<Value> = points
            .iter()
            .enumerate()
            .map(|(id, point)| point_feature(id, point))
            .collect();
        feature_collection(features)
    }

    pub fn lines_collection(lines: &LineTrack) -> Value {
        let features: Vec<Value> = lines
            .iter()
            .enumerate()
            .map(|(id, segment)| {
                let coordinates: Vec<[f64; 2]> =
                    segment.iter().map(|&(lon, lat)| [lon, lat]).collect();
                json!({
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": coordinates },
                    "properties": { "id": id },
                })
            })
            .collect();
        feature_collection(features)
    }

    /// Serialize one collection followed by a newline.
    pub fn write_to<W: Write>(&self, value: &Value, mut writer: W) -> Result<(), OutputError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn write(&self, value: &Value, target: &Path) -> Result<(), OutputError> {
        if is_stdout(target) {
            return self.write_to(value, io::stdout().lock());
        }
        create_parent(target)?;
        self.write_to(value, BufWriter::new(File::create(target)?))
    }
}

impl TrackSaver for GeoJsonSaver {
    fn save_points(&mut self, points: &PointTrack, target: &Path) -> Result<(), OutputError> {
        if points.is_empty() {
            return Err(OutputError::Empty(target.display().to_string()));
        }
        self.write(&Self::points_collection(points), target)?;
        log::info!("saved {} points to {}", points.len(), target.display());
        Ok(())
    }

    fn save_lines(&mut self, lines: &LineTrack, target: &Path) -> Result<(), OutputError> {
        if lines.is_empty() {
            return Err(OutputError::Empty(target.display().to_string()));
        }
        self.write(&Self::lines_collection(lines), target)?;
        log::info!("saved {} line segments to {}", lines.len(), target.display());
        Ok(())
    }
}

fn point_feature(id: usize, point: &TrackPoint) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [point.longitude_deg, point.latitude_deg],
        },
        "properties": {
            "point_id": id,
            "date_time": point.time.to_rfc3339(),
            "latitude": point.latitude_deg,
            "longitude": point.longitude_deg,
            "altitude": point.altitude_km,
            "velocity": point.speed_km_s,
            "azimuth": point.azimuth_deg,
            "trajectory_arc": point.trajectory_arc_deg,
            "true_anomaly": point.true_anomaly_deg,
            "inclination": point.inclination_deg,
        },
    })
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}
