//! Dispatcher error types

use std::any::Any;

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Appender creation error
    #[error("failed to create appender '{name}': {message}")]
    AppenderCreation { name: String, message: String },

    /// Appender failed to start
    #[error("failed to start appender '{name}'")]
    AppenderStart {
        name: String,
        #[source]
        source: contracts::AppendError,
    },

    /// Gate references an appender that does not exist
    #[error("gate references unknown appender '{name}'")]
    UnknownAppender { name: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create an appender creation error
    pub fn appender_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AppenderCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Panic raised inside an appender's `append`
#[derive(Debug, Error)]
#[error("appender panicked: {message}")]
pub struct AppenderPanic {
    message: String,
}

impl AppenderPanic {
    /// Extract the panic message from a `catch_unwind` payload
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self { message }
    }

    /// Panic message
    pub fn message(&self) -> &str {
        &self.message
    }
}
