//! ThresholdFilter - matches events by severity

use contracts::{Filter, FilterResult, Level, LogEvent};

use crate::lifecycle::LifeCycle;

/// Matches events at least as severe as the configured level
#[derive(Debug)]
pub struct ThresholdFilter {
    level: Level,
    on_match: FilterResult,
    on_mismatch: FilterResult,
    lifecycle: LifeCycle,
}

impl ThresholdFilter {
    /// Create a new ThresholdFilter
    pub fn new(level: Level, on_match: FilterResult, on_mismatch: FilterResult) -> Self {
        Self {
            level,
            on_match,
            on_mismatch,
            lifecycle: LifeCycle::new(),
        }
    }

    /// Configured level
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Filter for ThresholdFilter {
    fn filter(&self, event: &LogEvent) -> FilterResult {
        if event.level.is_more_specific_than(self.level) {
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
