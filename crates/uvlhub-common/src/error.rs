//! Error types for UVLHub

use thiserror::Error;

/// Result type alias for UVLHub operations
pub type Result<T> = std::result::Result<T, HubError>;

/// Main error type for UVLHub
#[derive(Error, Debug)]
pub enum HubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Archival mirror error: {0}")]
    Mirror(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
