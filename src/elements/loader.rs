use std::fs;
use std::path::Path;

use serde_json::Value;

use super::error::ElementSetError;
use super::parsing::parse_multi_tle;
use super::types::{ElementFormat, ElementSet};

/// Guess the element format from the file extension, falling back to the
/// first character of the content.
pub fn detect_format(path: &Path, content: &str) -> ElementFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ElementFormat::Omm,
        Some("tle") | Some("txt") => ElementFormat::Tle,
        _ if content.trim_start().starts_with(['[', '{']) => ElementFormat::Omm,
        _ => ElementFormat::Tle,
    }
}

/// Load every element set from a TLE or OMM file. Entries that fail to parse
/// are logged and skipped; a file without a single valid entry is an error.
pub fn load_elements(path: &Path) -> Result<Vec<ElementSet>, ElementSetError> {
    let content = fs::read_to_string(path)?;
    let format = detect_format(path, &content);
    let sets = parse_elements(&content, format)?;

    if sets.is_empty() {
        return Err(ElementSetError::Empty(path.display().to_string()));
    }
    log::debug!("loaded {} {} element sets from {}", sets.len(), format, path.display());
    Ok(sets)
}

pub fn parse_elements(
    content: &str,
    format: ElementFormat,
) -> Result<Vec<ElementSet>, ElementSetError> {
    let mut results = Vec::new();

    match format {
        ElementFormat::Tle => {
            for (name, line1, line2) in parse_multi_tle(content) {
                match ElementSet::from_tle(name.clone(), &line1, &line2) {
                    Ok(set) => results.push(set),
                    Err(e) => {
                        log::warn!("skipping TLE {}: {}", name.as_deref().unwrap_or(&line1), e);
                    }
                }
            }
        }
        ElementFormat::Omm => {
            let records = match serde_json::from_str::<Value>(content)? {
                Value::Array(records) => records,
                record => vec![record],
            };
            for (i, record) in records.iter().enumerate() {
                match ElementSet::from_omm(record) {
                    Ok(set) => results.push(set),
                    Err(e) => log::warn!("skipping OMM record {}: {}", i, e),
                }
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const L1: &str = "1 25544U 98067A   25087.50000000  .00016717  00000-0  30147-3 0  9997";
    const L2: &str = "2 25544  51.6386 123.4567 0004123  45.6789 314.4567 15.49512345499997";

    #[test]
    fn format_detection() {
        assert_eq!(detect_format(&PathBuf::from("a.json"), ""), ElementFormat::Omm);
        assert_eq!(detect_format(&PathBuf::from("a.tle"), "[{"), ElementFormat::Tle);
        assert_eq!(detect_format(&PathBuf::from("a"), "  [{}]"), ElementFormat::Omm);
        assert_eq!(detect_format(&PathBuf::from("a"), L1), ElementFormat::Tle);
    }

    #[test]
    fn bad_entries_are_skipped() {
        let broken = format!("{}0", &L2[..68]);
        let content = format!("GOOD\n{L1}\n{L2}\nBAD\n{L1}\n{broken}\n");
        let sets = parse_elements(&content, ElementFormat::Tle).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name(), "GOOD");
    }

    #[test]
    fn omm_array() {
        let content = serde_json::json!([
            { "OBJECT_NAME": "A", "INCLINATION": "51.6386", "TLE_LINE1": L1, "TLE_LINE2": L2 },
            { "OBJECT_NAME": "B", "INCLINATION": "51.6386" },
        ])
        .to_string();
        let sets = parse_elements(&content, ElementFormat::Omm).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name(), "A");
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = std::env::temp_dir().join("ground-track-loader-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.tle");
        fs::write(&path, "nothing here\n").unwrap();
        assert!(matches!(load_elements(&path), Err(ElementSetError::Empty(_))));
    }
}
