use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::engine::{EngineConfig, EngineError, OrbitalEngine};

const DEFAULT_DURATION_HOURS: f64 = 24.0;
const DEFAULT_STEP_MINUTES: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, String),
    #[error("set either duration or duration_hours, not both")]
    ConflictingDuration,
    #[error("no element file given")]
    MissingElements,
    #[error("invalid time window: {0}")]
    InvalidWindow(#[from] EngineError),
}

/// One run of the binary: which elements, which window, where to write.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Window start, RFC3339. Defaults to today 00:00 UTC.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Human readable window length such as `24h` or `90m`.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: f64,
    #[serde(default)]
    pub elements: Option<PathBuf>,
    /// GeoJSON points path; the line goes next to it with a `_line` suffix.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_create_line")]
    pub create_line: bool,
    #[serde(default)]
    pub save_elements: bool,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_step_minutes() -> f64 {
    DEFAULT_STEP_MINUTES
}

fn default_create_line() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start: None,
            duration: None,
            duration_hours: None,
            step_minutes: DEFAULT_STEP_MINUTES,
            elements: None,
            output: None,
            create_line: true,
            save_elements: false,
            engine: EngineConfig::default(),
        }
    }
}

/// Command line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub start: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub step_minutes: Option<f64>,
    pub elements: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_line: bool,
    pub save_elements: bool,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: RunOverrides) {
        if let Some(start) = overrides.start {
            self.start = Some(start);
        }
        if let Some(duration) = overrides.duration {
            self.duration = Some(duration);
            self.duration_hours = None;
        }
        if let Some(step) = overrides.step_minutes {
            self.step_minutes = step;
        }
        if let Some(elements) = overrides.elements {
            self.elements = Some(elements);
        }
        if let Some(output) = overrides.output {
            self.output = Some(output);
        }
        if overrides.no_line {
            self.create_line = false;
        }
        if overrides.save_elements {
            self.save_elements = true;
        }
    }

    pub fn start_or_today(&self) -> DateTime<Utc> {
        self.start
            .unwrap_or_else(|| Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc())
    }

    pub fn duration_hours(&self) -> Result<f64, ConfigError> {
        match (&self.duration, self.duration_hours) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingDuration),
            (Some(text), None) => humantime::parse_duration(text.trim())
                .map(|d| d.as_secs_f64() / 3600.0)
                .map_err(|e| ConfigError::InvalidDuration(text.clone(), e.to_string())),
            (None, Some(hours)) => Ok(hours),
            (None, None) => Ok(DEFAULT_DURATION_HOURS),
        }
    }

    pub fn elements_path(&self) -> Result<&Path, ConfigError> {
        self.elements.as_deref().ok_or(ConfigError::MissingElements)
    }

    /// Check everything that can be checked without reading the element
    /// file, including the engine section and the time window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.duration_hours()?;
        self.elements_path()?;
        OrbitalEngine::new(self.engine).time_grid(self.start_or_today(), hours, self.step_minutes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::BackendPolicy;
    use crate::track::GridBoundary;
    use chrono::TimeZone;

    const YAML: &str = r#"
start: 2025-03-28T00:00:00Z
duration: 12h
step_minutes: 0.5
elements: data/iss.tle
output: tracks/iss.geojson
save_elements: true
engine:
  boundary: exclusive
  backend:
    kind: by_period
    deep_space_period_minutes: 300
"#;

    #[test]
    fn parse_run_config() {
        let config = RunConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.start, Some(Utc.with_ymd_and_hms(2025, 3, 28, 0, 0, 0).unwrap()));
        assert_eq!(config.duration_hours().unwrap(), 12.0);
        assert_eq!(config.step_minutes, 0.5);
        assert_eq!(config.elements_path().unwrap(), Path::new("data/iss.tle"));
        assert!(config.create_line);
        assert!(config.save_elements);
        assert_eq!(config.engine.boundary, GridBoundary::Exclusive);
        assert_eq!(
            config.engine.backend,
            BackendPolicy::ByPeriod {
                deep_space_period_minutes: 300.0
            }
        );
    }

    #[test]
    fn defaults() {
        let config = RunConfig::from_yaml("elements: a.tle").unwrap();
        assert_eq!(config.duration_hours().unwrap(), 24.0);
        assert_eq!(config.step_minutes, 1.0);
        assert!(config.output.is_none());
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_win() {
        let mut config = RunConfig::from_yaml(YAML).unwrap();
        config.apply(RunOverrides {
            duration: Some("90m".into()),
            step_minutes: Some(2.0),
            no_line: true,
            ..Default::default()
        });
        assert_eq!(config.duration_hours().unwrap(), 1.5);
        assert_eq!(config.step_minutes, 2.0);
        assert!(!config.create_line);
        assert!(config.save_elements);
    }

    #[test]
    fn duration_errors() {
        let config = RunConfig::from_yaml("duration: 1h\nduration_hours: 1").unwrap();
        assert!(matches!(config.duration_hours(), Err(ConfigError::ConflictingDuration)));

        let config = RunConfig::from_yaml("duration: soon").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDuration(..))));
        assert!(matches!(config.duration_hours(), Err(ConfigError::InvalidDuration(..))));
        assert!(matches!(config.elements_path(), Err(ConfigError::MissingElements)));
    }

    #[test]
    fn window_is_part_of_validation() {
        for yaml in [
            "elements: a.tle\nstep_minutes: 0",
            "elements: a.tle\nstep_minutes: -1",
            "elements: a.tle\nduration_hours: 0",
            "elements: a.tle\nduration: 0s",
            "elements: a.tle\nengine:\n  kepler_tolerance: -1",
        ] {
            let config = RunConfig::from_yaml(yaml).unwrap();
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidWindow(EngineError::InvalidConfig(_)))
                ),
                "{yaml}"
            );
        }
    }
}
