//! Error types for loading and interpreting tracker inputs.
//!
//! The engine itself never fails: every classification and aggregation is a
//! total function over its inputs. Errors only arise at the edges, when
//! parsing names typed by a user or reading files.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Unrecognized role: {0}")]
    UnknownRole(String),

    #[error("Unrecognized delay category: {0}")]
    UnknownCategory(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Failed to parse config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
