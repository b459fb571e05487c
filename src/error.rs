//! Error types for loading, cleaning and configuration.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup errors of the dashboard pipeline.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("Missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized Result type for pipeline operations
pub type Result<T> = std::result::Result<T, DashboardError>;
