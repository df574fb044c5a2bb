//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid command-line combination
    #[error("Invalid arguments: {message}")]
    InvalidArgs { message: String },

    /// A delivery worker did not finish cleanly
    #[error("Worker {index} failed: {message}")]
    Worker { index: usize, message: String },

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs {
            message: message.into(),
        }
    }

    pub fn worker(index: usize, message: impl Into<String>) -> Self {
        Self::Worker {
            index,
            message: message.into(),
        }
    }
}
