//! Error types for warclip-core

use thiserror::Error;

/// Main error type for the warclip-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sidecar metadata that could not be turned into a session
    #[error("invalid metadata in {path}: {message}")]
    Metadata { path: String, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Companion channel error
    #[error("companion error: {0}")]
    Companion(String),

    /// Tag persistence could not be scheduled
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

/// Result type alias for warclip-core
pub type Result<T> = std::result::Result<T, Error>;
