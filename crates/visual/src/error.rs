use thiserror::Error;

/// Errors that can occur while rendering charts.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Drawing backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
    /// Invalid rendering configuration.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Data the chart cannot be drawn from.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// I/O operation error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

pub(crate) fn backend_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}
