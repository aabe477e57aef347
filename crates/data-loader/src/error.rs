//! Error types for the data-loader crate.
//!
//! Every failure the loader can report is a variant of [`DataLoadError`].
//! Variants carry enough context (file, line, offending value) to point a
//! user at the broken row without re-reading the file.

use thiserror::Error;

use crate::types::MovieId;

/// Errors that can occur during catalog loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a record (bad quoting, wrong field type, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// Two catalog rows share the same movieId
    #[error("Duplicate movieId {id} in catalog")]
    DuplicateId { id: MovieId },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
