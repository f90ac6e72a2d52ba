//! Error types for moodscope-core

use thiserror::Error;

/// Main error type for the moodscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Journal database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A caller-supplied date could not be parsed.
    ///
    /// Distinct from "valid date, no data", which is an empty report.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A caller asked for a period that does not exist
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// A thread panicked while holding the journal connection
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

/// Result type alias for moodscope-core
pub type Result<T> = std::result::Result<T, Error>;
