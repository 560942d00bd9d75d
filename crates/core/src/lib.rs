//! Core library: ingestion, exclusion, cleaning, classification,
//! categorization and aggregation of organization names from file listings.

pub mod aggregator;
pub mod categorizer;
pub mod classifier;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod ingest;
pub mod models;
pub mod patterns;
pub mod pipeline;
pub mod rules;
pub mod vocabulary;

pub use error::{AnalysisError, ConfigError};
pub use pipeline::{AnalysisReport, AnalyzeOptions, Analyzer, CancelToken, PartialPolicy};
