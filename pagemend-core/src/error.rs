//! Error types for Pagemend

use thiserror::Error;

/// Result type alias for Pagemend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Pagemend operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Completion service error
    #[error("Completion service error: {0}")]
    Completion(String),

    /// Knowledge base error
    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    /// Pipeline stage error
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
