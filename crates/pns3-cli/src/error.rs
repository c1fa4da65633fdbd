//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or unsupported scenario file
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Rejected probability input
    #[error("Validation error: {0}")]
    Validation(#[from] pns3_domain::ValidationError),

    /// Study error
    #[error("Study error: {0}")]
    Study(#[from] pns3_study::StudyError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
