//! Error types for the snippet store

use thiserror::Error;

/// Result type alias for snippet store operations
pub type Result<T> = std::result::Result<T, SnipError>;

/// Errors raised by the storage layer.
///
/// Empty input and unknown commands are handled inside the command loop and
/// never surface here; every variant below is fatal to an interactive session.
#[derive(Error, Debug)]
pub enum SnipError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("Invalid collection name {name:?}: {reason}")]
    InvalidCollectionName { name: String, reason: String },

    #[error("Collection mismatch: {reason}")]
    CollectionMismatch { reason: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
