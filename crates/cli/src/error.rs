//! Error types for CLI operations.

use chatlens_analysis::AnalysisError;
use thiserror::Error;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis step failed.
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<chatlens_core::Error> for CliError {
    fn from(err: chatlens_core::Error) -> Self {
        match err {
            chatlens_core::Error::Config(msg) => Self::Config(msg),
            chatlens_core::Error::Io(e) => Self::Io(e),
            other => Self::Parse(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
