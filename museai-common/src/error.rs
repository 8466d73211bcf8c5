//! Common error types for MuseAI

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for MuseAI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MuseAI crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An artifact could not be encoded (MIDI, PNG)
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Persisted state exists but cannot be read or parsed
    #[error("Corrupt state file {}: {message}", path.display())]
    CorruptState { path: PathBuf, message: String },

    /// Persisted state could not be written; the caller may retry
    #[error("Persistence error: {0}")]
    Persistence(#[source] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }
}
