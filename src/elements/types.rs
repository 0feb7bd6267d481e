use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sgp4::Elements;

use super::error::ElementSetError;
use super::parsing::{
    inclination_from_line2, omm_f64, omm_str, parse_inclination, parse_tle_lines,
};

const MINUTES_PER_DAY: f64 = 1440.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ElementFormat {
    Tle,
    Omm,
}

/// The representation an element set was built from. Exactly one is active.
#[derive(Debug, Clone)]
pub enum ElementSource {
    Tle { line1: String, line2: String },
    Omm(Map<String, Value>),
}

impl ElementSource {
    pub fn format(&self) -> ElementFormat {
        match self {
            ElementSource::Tle { .. } => ElementFormat::Tle,
            ElementSource::Omm(_) => ElementFormat::Omm,
        }
    }
}

/// Elements as received, before any validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "UPPERCASE")]
pub enum RawElements {
    Tle {
        #[serde(default)]
        name: Option<String>,
        fields: Vec<String>,
    },
    Omm {
        record: Value,
    },
}

impl RawElements {
    pub fn parse(&self) -> Result<ElementSet, ElementSetError> {
        match self {
            RawElements::Tle { name, fields } => {
                ElementSet::from_tle_fields(name.clone(), fields.as_slice())
            }
            RawElements::Omm { record } => ElementSet::from_omm(record),
        }
    }
}

/// Validated mean orbital elements of one satellite. Immutable once built.
#[derive(Debug, Clone)]
pub struct ElementSet {
    name: String,
    source: ElementSource,
    elements: Elements,
    inclination_deg: f64,
}

impl ElementSet {
    pub fn from_tle(
        name: Option<String>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, ElementSetError> {
        let line1 = line1.trim();
        let line2 = line2.trim();
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())?;
        let inclination_deg = inclination_from_line2(line2)?;

        Ok(Self {
            name: display_name(name, &elements),
            source: ElementSource::Tle {
                line1: line1.to_string(),
                line2: line2.to_string(),
            },
            elements,
            inclination_deg,
        })
    }

    /// Build from a 2 or 3 line TLE text block (optional name line first).
    pub fn from_tle_text(tle: &str) -> Result<Self, ElementSetError> {
        let (name, line1, line2) = parse_tle_lines(tle)?;
        Self::from_tle(name, &line1, &line2)
    }

    /// Build from a `(line1, line2[, inclination])` tuple as handed over by a
    /// data source. An explicit inclination replaces the one in line 2.
    pub fn from_tle_fields<S: AsRef<str>>(
        name: Option<String>,
        fields: &[S],
    ) -> Result<Self, ElementSetError> {
        match fields {
            [line1, line2] => Self::from_tle(name, line1.as_ref(), line2.as_ref()),
            [line1, line2, inclination] => {
                let mut set = Self::from_tle(name, line1.as_ref(), line2.as_ref())?;
                set.inclination_deg = parse_inclination(inclination.as_ref())?;
                Ok(set)
            }
            _ => Err(ElementSetError::TleArity(fields.len())),
        }
    }

    /// Build from an OMM record carrying at least `TLE_LINE1`, `TLE_LINE2`
    /// and `INCLINATION`.
    pub fn from_omm(record: &Value) -> Result<Self, ElementSetError> {
        let record = record.as_object().ok_or(ElementSetError::NotAnObject)?;

        let line1 = omm_str(record, "TLE_LINE1")?.trim();
        let line2 = omm_str(record, "TLE_LINE2")?.trim();
        let inclination_deg = omm_f64(record, "INCLINATION")?;

        let name = omm_str(record, "OBJECT_NAME")
            .ok()
            .or_else(|| omm_str(record, "TLE_LINE0").ok())
            .map(|n| n.trim().strip_prefix("0 ").unwrap_or(n.trim()).to_string());

        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())?;

        Ok(Self {
            name: display_name(name, &elements),
            source: ElementSource::Omm(record.clone()),
            elements,
            inclination_deg,
        })
    }

    pub fn from_omm_json(json: &str) -> Result<Self, ElementSetError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(records) => match records.first() {
                Some(record) => Self::from_omm(record),
                None => Err(ElementSetError::Empty("OMM array".into())),
            },
            record => Self::from_omm(&record),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ElementSource {
        &self.source
    }

    pub fn format(&self) -> ElementFormat {
        self.source.format()
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.elements.datetime, Utc)
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// Mean anomaly at epoch, degrees.
    pub fn mean_anomaly_deg(&self) -> f64 {
        self.elements.mean_anomaly
    }

    /// Revolutions per day.
    pub fn mean_motion(&self) -> f64 {
        self.elements.mean_motion
    }

    pub fn inclination_deg(&self) -> f64 {
        self.inclination_deg
    }

    pub fn period_minutes(&self) -> f64 {
        MINUTES_PER_DAY / self.elements.mean_motion
    }
}

fn display_name(name: Option<String>, elements: &Elements) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("NORAD {}", elements.norad_id))
}
