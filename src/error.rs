//! Error types for daybook_db

use thiserror::Error;

/// Result type alias for daybook_db operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in daybook_db operations
///
/// An absent key is never an error: reads of unknown keys produce an empty
/// [`Log`](crate::Log) or `None`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to decode log for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timestamp out of range: {0} ms")]
    InvalidTimestamp(i64),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid store file: {0}")]
    InvalidFile(String),

    #[error("Config error: {0}")]
    Config(String),
}
