//! CompositeFilter - ordered chain of filters

use std::sync::Arc;

use contracts::{Filter, FilterResult, LogEvent};

use crate::lifecycle::LifeCycle;

/// Evaluates filters in order; the first `Accept` or `Deny` wins
pub struct CompositeFilter {
    filters: Vec<Arc<dyn Filter>>,
    lifecycle: LifeCycle,
}

impl CompositeFilter {
    /// Create a new CompositeFilter
    pub fn new(filters: Vec<Arc<dyn Filter>>) -> Self {
        Self {
            filters,
            lifecycle: LifeCycle::new(),
        }
    }

    /// Number of child filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether there are no child filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for CompositeFilter {
    fn filter(&self, event: &LogEvent) -> FilterResult {
        self.filters
            .iter()
            .map(|filter| filter.filter(event))
            .find(|result| *result != FilterResult::Neutral)
            .unwrap_or(FilterResult::Neutral)
    }

    fn start(&self) {
        if self.lifecycle.start() {
            for filter in &self.filters {
                filter.start();
            }
        }
    }

    fn stop(&self) {
        if self.lifecycle.stop() {
            for filter in &self.filters {
                filter.stop();
            }
        }
    }

    fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }
}
