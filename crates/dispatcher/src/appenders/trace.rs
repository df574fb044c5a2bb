//! TracingAppender - forwards events into `tracing`

use contracts::{AppendError, Appender, Level, LogEvent};
use tracing::{debug, error, info, trace, warn};

use super::AppenderCore;

/// Appender re-emitting each event as a `tracing` event of matching level
#[derive(Debug)]
pub struct TracingAppender {
    core: AppenderCore,
}

impl TracingAppender {
    /// Create a new TracingAppender
    pub fn new(core: AppenderCore) -> Self {
        Self { core }
    }

    fn emit(&self, event: &LogEvent) {
        let sink = self.core.name();
        let logger = event.logger_name.as_str();
        let thread = event.thread_name.as_deref().unwrap_or("-");
        let message = event.message.as_str();

        match event.level {
            Level::Off => {}
            Level::Fatal | Level::Error => {
                error!(sink, logger, thread, thrown = ?event.thrown, "{message}")
            }
            Level::Warn => warn!(sink, logger, thread, "{message}"),
            Level::Info => info!(sink, logger, thread, "{message}"),
            Level::Debug => debug!(sink, logger, thread, "{message}"),
            Level::Trace | Level::All => trace!(sink, logger, thread, "{message}"),
        }
    }
}

impl Appender for TracingAppender {
    delegate_appender_core!();

    fn append(&self, event: &LogEvent) -> Result<(), AppendError> {
        self.emit(event);
        Ok(())
    }

    fn start(&self) -> Result<(), AppendError> {
        if self.core.mark_started() {
            debug!(sink = %self.core.name(), "TracingAppender started");
        }
        Ok(())
    }

    fn stop(&self) {
        if self.core.mark_stopped() {
            debug!(sink = %self.core.name(), "TracingAppender stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_appender_append() {
        let appender = TracingAppender::new(AppenderCore::new("console"));
        appender.start().unwrap();

        for level in Level::VALUES {
            let event = LogEvent::new(level, "app", "hello");
            assert!(appender.append(&event).is_ok());
        }
    }

    #[test]
    fn test_tracing_appender_lifecycle() {
        let appender = TracingAppender::new(AppenderCore::new("console"));
        assert_eq!(appender.name(), "console");
        assert!(!appender.is_started());
        appender.start().unwrap();
        assert!(appender.is_started());
        appender.stop();
        assert!(!appender.is_started());
    }
}
