//! Custom error types for job orchestration

use thiserror::Error;

/// Errors raised while orchestrating a translation job
#[derive(Error, Debug)]
pub enum TranslateError {
    /// No file was supplied with the request
    #[error("no input file supplied")]
    NoFileSupplied,

    /// Provider name is not in the catalog
    #[error("unknown provider: {name}")]
    UnknownProvider {
        name: String,
    },

    /// External engine exited with a non-zero status
    #[error("engine error: {message}")]
    EngineFailed {
        message: String,
    },

    /// External engine exited cleanly but produced no artifact
    #[error("engine produced no output file")]
    NoOutputProduced,

    /// Configuration error
    #[error("configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<anyhow::Error> for TranslateError {
    fn from(err: anyhow::Error) -> Self {
        TranslateError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, TranslateError>;
