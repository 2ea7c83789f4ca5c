//! Error types for the scour engine.
//!
//! A single error enum covers every failure domain: ingestion, the strict
//! date-normalization path, and report execution. Engine-internal
//! operations that cannot fail (deduplication, the lenient date repair)
//! do not return `Result`.

use thiserror::Error;

/// The primary error type for scour operations.
#[derive(Error, Debug)]
pub enum ScourError {
    /// A sale_date value that must parse as `YYYY-MM-DD` did not.
    #[error("invalid sale_date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// An operation was run against data in the wrong state.
    #[error("execution error: {message}")]
    Execution { message: String },

    /// CSV decoding error.
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// JSON encoding error.
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ScourError {
    /// Create an invalid-date error for a value that failed strict parsing.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Create an execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// Result type alias for scour operations.
pub type Result<T> = std::result::Result<T, ScourError>;
