use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElementSetError {
    #[error("expected 2 or 3 TLE fields, got {0}")]
    TleArity(usize),
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("invalid inclination field {0:?}")]
    InvalidInclination(String),
    #[error("OMM record must be a JSON object")]
    NotAnObject,
    #[error("OMM record is missing {0}")]
    MissingField(&'static str),
    #[error("OMM field {0} has an unexpected type")]
    InvalidField(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("element file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("no element sets found in {0}")]
    Empty(String),
}
