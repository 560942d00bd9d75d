use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid source {path}: {reason}")]
    Validation { path: PathBuf, reason: String },
    #[error("could not read {path} with any supported encoding (tried {})", .tried.join(", "))]
    Ingestion { path: PathBuf, tried: Vec<String> },
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("aggregation invariant violated: {0}")]
    AggregationInvariant(String),
    #[error("analysis cancelled")]
    Cancelled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The Enhanced classifier could not be used; analysis continues in Basic mode.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("enhanced backend '{backend}' unavailable: {reason}")]
pub struct ClassificationDegraded {
    pub backend: String,
    pub reason: String,
}
