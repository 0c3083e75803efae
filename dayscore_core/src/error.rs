//! Error types for the dayscore_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dayscore_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Category/profile/compensation-rule validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown category referenced by an entry or rule
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
