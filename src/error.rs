//! Error types for hostmatrix.

use thiserror::Error;

/// Error type for hostmatrix operations.
///
/// Evaluation and mutation never fail; only snapshot decoding, legacy
/// migration and configuration loading return errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Structured snapshot carries a foreign format tag
    #[error("invalid snapshot magic: expected {expected}, got {found}")]
    InvalidMagic { expected: String, found: String },

    /// Unknown request type name
    #[error("invalid request type: {0}")]
    InvalidRequestType(String),

    /// Unknown cell state name
    #[error("invalid cell state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for hostmatrix operations.
pub type Result<T> = std::result::Result<T, Error>;
