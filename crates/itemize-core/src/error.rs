//! Error types for the itemize-core library.
//!
//! The extraction path itself never fails: unparseable fields degrade to
//! `None` and unmatched lines are skipped. These errors cover the surfaces
//! around it (configuration and size-checked parsing).

use thiserror::Error;

/// Main error type for the itemize library.
#[derive(Error, Debug)]
pub enum ItemizeError {
    /// Line item extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the checked parser front end.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Input exceeds the configured character ceiling.
    #[error("input has {chars} characters, limit is {max}")]
    InputTooLarge { chars: usize, max: usize },

    /// A parser setting is out of range.
    #[error("invalid setting {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

/// Result type for the itemize library.
pub type Result<T> = std::result::Result<T, ItemizeError>;
