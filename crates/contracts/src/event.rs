//! LogEvent - the record flowing from the logging pipeline into gates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Level;

/// Immutable log event
///
/// Gates and appenders only ever see `&LogEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event severity
    pub level: Level,

    /// Name of the logger that produced the event
    pub logger_name: String,

    /// Formatted message
    pub message: String,

    /// Producing thread, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Rendered error attached to the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thrown: Option<String>,
}

impl LogEvent {
    /// Create an event stamped with the current time and thread
    pub fn new(level: Level, logger_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            logger_name: logger_name.into(),
            message: message.into(),
            thread_name: std::thread::current().name().map(str::to_string),
            timestamp: Utc::now(),
            thrown: None,
        }
    }

    /// Attach a rendered error
    pub fn with_thrown(mut self, thrown: impl Into<String>) -> Self {
        self.thrown = Some(thrown.into());
        self
    }
}
