//! Error types for dataset loading and aggregation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or preparing the salary dataset.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The dataset file could not be opened or read.
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row is missing one or more required columns.
    #[error("Dataset {path} is missing required column(s): {}", missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// The file is not valid delimited text.
    #[error("Dataset {path} could not be parsed: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row is missing a field or holds a value of the wrong type.
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    /// The file has a header but no data rows.
    #[error("Dataset {0} contains no records")]
    EmptyDataset(PathBuf),
}

/// Result alias used by the dataset and analysis modules.
pub type Result<T> = std::result::Result<T, DashboardError>;
