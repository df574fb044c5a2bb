//! Appender trait - the output sink behind a dispatch gate

use crate::{AppendError, Filterable, LogEvent};

/// Receives failures raised while delivering to an appender
pub trait ErrorHandler: Send + Sync {
    /// Report a failure with an optional cause
    fn error(&self, message: &str, cause: Option<&(dyn std::error::Error + 'static)>);
}

/// Output sink
///
/// All appender implementations must implement this trait. Appenders are
/// shared between threads and receive `&self`; any interior state is the
/// appender's own responsibility.
pub trait Appender: Send + Sync {
    /// Appender name (used for logging/metrics and failure messages)
    fn name(&self) -> &str;

    /// Write one event
    ///
    /// # Errors
    /// Returns the write failure. Return [`AppendError::Logging`] when the
    /// failure is already an appender delivery failure.
    fn append(&self, event: &LogEvent) -> Result<(), AppendError>;

    /// Acquire resources and begin accepting events
    fn start(&self) -> Result<(), AppendError>;

    /// Release resources
    fn stop(&self);

    /// Whether the appender is started
    fn is_started(&self) -> bool;

    /// Whether delivery failures are swallowed after being reported
    fn ignore_exceptions(&self) -> bool;

    /// Handler receiving delivery failures
    fn handler(&self) -> &dyn ErrorHandler;

    /// Own filtering capability, if the appender has one
    fn as_filterable(&self) -> Option<&dyn Filterable> {
        None
    }
}
