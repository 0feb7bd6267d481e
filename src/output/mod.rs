mod error;
mod geojson;
mod memory;

use std::fs;
use std::path::{Path, PathBuf};

use crate::elements::{ElementSet, ElementSource};
use crate::track::{LineTrack, PointTrack};

pub use error::OutputError;
pub use geojson::GeoJsonSaver;
pub use memory::MemorySaver;

/// Where computed tracks go. `target` is a file path for savers that write
/// to disk and a layer name for the in-memory one.
pub trait TrackSaver {
    fn save_points(&mut self, points: &PointTrack, target: &Path) -> Result<(), OutputError>;
    fn save_lines(&mut self, lines: &LineTrack, target: &Path) -> Result<(), OutputError>;
}

/// Target name that file savers treat as standard output.
pub const STDOUT: &str = "-";

pub fn is_stdout(target: &Path) -> bool {
    target.as_os_str() == STDOUT
}

/// `tracks/iss.geojson` -> `tracks/iss_line.geojson`. Standard output stays as is.
pub fn line_path(points_path: &Path) -> PathBuf {
    if is_stdout(points_path) {
        return points_path.to_path_buf();
    }
    with_suffix(points_path, "_line", points_path.extension().and_then(|e| e.to_str()))
}

/// Per-satellite path for files holding several element sets:
/// `tracks/iss.geojson` -> `tracks/iss_25544_20250328T120000.geojson`.
/// The epoch keeps two element sets of the same object apart.
pub fn satellite_path(base: &Path, elements: &ElementSet) -> PathBuf {
    if is_stdout(base) {
        return base.to_path_buf();
    }
    let suffix = format!(
        "_{}_{}",
        elements.norad_id(),
        elements.epoch().format("%Y%m%dT%H%M%S")
    );
    with_suffix(base, &suffix, base.extension().and_then(|e| e.to_str()))
}

/// Write the source representation of `elements` next to `base`, as
/// `<base>_tle.txt` or `<base>_omm.json`. Returns the written path.
pub fn save_element_source(elements: &ElementSet, base: &Path) -> Result<PathBuf, OutputError> {
    let (path, content) = match elements.source() {
        ElementSource::Tle { line1, line2 } => (
            with_suffix(base, "_tle", Some("txt")),
            format!("{}\n{}\n{}\n", elements.name(), line1, line2),
        ),
        ElementSource::Omm(record) => (
            with_suffix(base, "_omm", Some("json")),
            serde_json::to_string_pretty(record)?,
        ),
    };

    create_parent(&path)?;
    fs::write(&path, content)?;
    log::info!("{}: elements saved to {}", elements.name(), path.display());
    Ok(path)
}

pub(crate) fn create_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

fn with_suffix(path: &Path, suffix: &str, extension: Option<&str>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match extension {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const L1: &str = "1 25544U 98067A   25087.50000000  .00016717  00000-0  30147-3 0  9997";
    const L2: &str = "2 25544  51.6386 123.4567 0004123  45.6789 314.4567 15.49512345499997";

    #[test]
    fn line_path_keeps_extension() {
        assert_eq!(
            line_path(Path::new("tracks/iss.geojson")),
            PathBuf::from("tracks/iss_line.geojson")
        );
        assert_eq!(line_path(Path::new("iss")), PathBuf::from("iss_line"));
        assert_eq!(line_path(Path::new(STDOUT)), PathBuf::from(STDOUT));
    }

    #[test]
    fn satellite_paths_differ_by_epoch() {
        let later_l1 = "1 25544U 98067A   25088.50000000  .00016717  00000-0  30147-3 0  9998";
        let first = ElementSet::from_tle(Some("ISS".into()), L1, L2).unwrap();
        let second = ElementSet::from_tle(Some("ISS".into()), later_l1, L2).unwrap();
        let base = Path::new("tracks/iss.geojson");

        assert_eq!(
            satellite_path(base, &first),
            PathBuf::from("tracks/iss_25544_20250328T120000.geojson")
        );
        assert_eq!(
            satellite_path(base, &second),
            PathBuf::from("tracks/iss_25544_20250329T120000.geojson")
        );
        assert_eq!(satellite_path(Path::new(STDOUT), &first), PathBuf::from(STDOUT));
    }

    #[test]
    fn element_source_file_names() {
        let dir = std::env::temp_dir().join("ground_track_output_mod");
        let set = ElementSet::from_tle(Some("ISS".into()), L1, L2).unwrap();

        let written = save_element_source(&set, &dir.join("iss.geojson")).unwrap();
        assert_eq!(written, dir.join("iss_tle.txt"));
        let content = fs::read_to_string(&written).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["ISS", L1, L2]);

        let record =
            serde_json::json!({ "INCLINATION": 51.6386, "TLE_LINE1": L1, "TLE_LINE2": L2 });
        let set = ElementSet::from_omm(&record).unwrap();
        let written = save_element_source(&set, &dir.join("iss")).unwrap();
        assert_eq!(written, dir.join("iss_omm.json"));
        let back: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(back, record);
    }
}
