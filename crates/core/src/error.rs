use thiserror::Error;

use crate::domain::Severity;

#[derive(Debug, Error)]
#[error("unknown confidence tag: {0:?}")]
pub struct UnknownConfidence(pub String);

/// Why a source could not produce a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed body: {0}")]
    Malformed(String),
    #[error("could not read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("source not configured")]
    NotConfigured,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot total {claimed} does not match {actual} fires")]
    TotalMismatch { claimed: usize, actual: usize },
    #[error("{} tier does not match the fire list", .0.as_str())]
    Inconsistent(Severity),
    #[error("fire {id} is listed under {listed:?} but tagged {tagged:?}")]
    TierConflict {
        id: String,
        listed: Severity,
        tagged: Severity,
    },
}

impl From<SnapshotError> for FetchError {
    fn from(error: SnapshotError) -> Self {
        Self::Malformed(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("boundary has no line or polygon geometry")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },
}
