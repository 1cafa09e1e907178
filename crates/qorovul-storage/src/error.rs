//! Storage error types.

use qorovul_core::{ClassifierError, SuspensionError};
use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from rusqlite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (e.g., creating directories).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored value could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// A suspension record failed its invariants.
    #[error("Suspension error: {0}")]
    Suspension(#[from] SuspensionError),

    /// Stored word lists are invalid.
    #[error("Word list error: {0}")]
    WordLists(#[from] ClassifierError),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
