//! LoggerNameFilter - matches events by logger name prefix

use contracts::{Filter, FilterResult, LogEvent};

use crate::lifecycle::LifeCycle;

/// Matches events whose logger name starts with a prefix
#[derive(Debug)]
pub struct LoggerNameFilter {
    prefix: String,
    on_match: FilterResult,
    on_mismatch: FilterResult,
    lifecycle: LifeCycle,
}

impl LoggerNameFilter {
    /// Create a new LoggerNameFilter
    pub fn new(prefix: impl Into<String>, on_match: FilterResult, on_mismatch: FilterResult) -> Self {
        Self {
            prefix: prefix.into(),
            on_match,
            on_mismatch,
            lifecycle: LifeCycle::new(),
        }
    }
}

impl Filter for LoggerNameFilter {
    fn filter(&self, event: &LogEvent) -> FilterResult {
        if event.logger_name.starts_with(&self.prefix) {
            self.on_match
        } else {
            self.on_mismatch
        }
    }

    fn start(&self) {
        self.lifecycle.start();
    }

    fn stop(&self) {
        self.lifecycle.stop();
    }

    fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }
}
