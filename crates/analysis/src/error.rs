use chatlens_visual::RenderError;
use thiserror::Error;

/// Errors that can occur during analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A step was invoked before the state it depends on exists.
    #[error("Precondition failed: {0}")]
    Precondition(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Message table could not be loaded.
    #[error("Load error: {0}")]
    Load(String),
    /// I/O operation error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Chart rendering error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    /// Tokenization error.
    #[error("Tokenization error: {0}")]
    Tokenization(String),
}

impl AnalysisError {
    /// Create a precondition error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a load error.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }
}

impl From<chatlens_core::Error> for AnalysisError {
    fn from(err: chatlens_core::Error) -> Self {
        match err {
            chatlens_core::Error::Config(msg) => Self::Config(msg),
            chatlens_core::Error::Io(e) => Self::Io(e),
            other => Self::Load(other.to_string()),
        }
    }
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
