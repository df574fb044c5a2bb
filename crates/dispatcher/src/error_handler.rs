//! DefaultErrorHandler - reports appender failures via tracing

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use contracts::ErrorHandler;
use tracing::error;

/// Reports passed through before throttling starts
pub const MAX_EXCEPTIONS: u64 = 3;

/// Quiet period after which a throttled handler reports again
pub const EXCEPTION_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Default)]
struct ThrottleState {
    count: u64,
    last: Option<Instant>,
}

/// Error handler logging failures through `tracing`
///
/// The first [`MAX_EXCEPTIONS`] reports always go out. After that a report is
/// only emitted when no failure was seen for [`EXCEPTION_INTERVAL`], so an
/// appender failing on every event does not flood the log.
#[derive(Debug)]
pub struct DefaultErrorHandler {
    appender: String,
    max_exceptions: u64,
    interval: Duration,
    state: Mutex<ThrottleState>,
}

impl DefaultErrorHandler {
    /// Create a handler for the named appender
    pub fn new(appender: impl Into<String>) -> Self {
        Self::with_limits(appender, MAX_EXCEPTIONS, EXCEPTION_INTERVAL)
    }

    /// Create a handler with custom throttling limits
    pub fn with_limits(appender: impl Into<String>, max_exceptions: u64, interval: Duration) -> Self {
        Self {
            appender: appender.into(),
            max_exceptions,
            interval,
            state: Mutex::new(ThrottleState::default()),
        }
    }

    /// Appender this handler reports for
    pub fn appender_name(&self) -> &str {
        &self.appender
    }

    /// Decide whether the current report is emitted and record it
    fn should_report(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let quiet_long_enough = state
            .last
            .map_or(true, |last| now.duration_since(last) > self.interval);
        let under_limit = state.count < self.max_exceptions;
        state.count = state.count.saturating_add(1);
        state.last = Some(now);
        quiet_long_enough || under_limit
    }
}

impl ErrorHandler for DefaultErrorHandler {
    fn error(&self, message: &str, cause: Option<&(dyn std::error::Error + 'static)>) {
        if !self.should_report(Instant::now()) {
            return;
        }
        match cause {
            Some(cause) => error!(appender = %self.appender, error = %cause, "{message}"),
            None => error!(appender = %self.appender, "{message}"),
        }
    }
}
