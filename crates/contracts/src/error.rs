//! Layered error definitions
//!
//! Categorized by source: config / delivery

use thiserror::Error;

/// Boxed error raised by appender implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for configuration and contract violations
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Unknown level name
    #[error("unknown level '{name}'")]
    UnknownLevel { name: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create unknown level error
    pub fn unknown_level(name: impl Into<String>) -> Self {
        Self::UnknownLevel { name: name.into() }
    }
}

/// Canonical appender delivery failure
///
/// The only failure shape that crosses a dispatch gate.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppenderLoggingError {
    appender: Option<String>,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl AppenderLoggingError {
    /// Create a failure not yet tied to an appender
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            appender: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a failure raised while delivering to `appender`
    pub fn for_appender(
        appender: impl Into<String>,
        message: impl Into<String>,
        source: Option<BoxError>,
    ) -> Self {
        Self {
            appender: Some(appender.into()),
            message: message.into(),
            source,
        }
    }

    /// Name of the appender the failure belongs to, if known
    pub fn appender_name(&self) -> Option<&str> {
        self.appender.as_deref()
    }

    /// Failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure returned by [`crate::Appender`] operations
///
/// `Logging` marks a failure that is already canonical and must not be
/// wrapped again.
#[derive(Debug, Error)]
pub enum AppendError {
    /// Already an appender delivery failure
    #[error(transparent)]
    Logging(#[from] AppenderLoggingError),

    /// Any other failure
    #[error(transparent)]
    Other(BoxError),
}

impl AppendError {
    /// Wrap an arbitrary error
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }

    /// Borrow the underlying failure as a report cause
    pub fn as_cause(&self) -> &(dyn std::error::Error + 'static) {
        match self {
            AppendError::Logging(err) => err,
            AppendError::Other(err) => err.as_ref(),
        }
    }
}

impl From<std::io::Error> for AppendError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
