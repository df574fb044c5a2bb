//! Filter implementations
//!
//! Contains ThresholdFilter, LoggerNameFilter, and CompositeFilter.

mod composite;
mod logger_name;
mod threshold;

use std::sync::Arc;

use contracts::{Filter, FilterConfig};

pub use self::composite::CompositeFilter;
pub use self::logger_name::LoggerNameFilter;
pub use self::threshold::ThresholdFilter;

/// Create a filter from its configuration
pub fn create_filter(config: &FilterConfig) -> Arc<dyn Filter> {
    match config {
        FilterConfig::Threshold {
            level,
            on_match,
            on_mismatch,
        } => Arc::new(ThresholdFilter::new(*level, *on_match, *on_mismatch)),
        FilterConfig::LoggerName {
            prefix,
            on_match,
            on_mismatch,
        } => Arc::new(LoggerNameFilter::new(prefix, *on_match, *on_mismatch)),
        FilterConfig::Composite { filters } => {
            Arc::new(CompositeFilter::new(filters.iter().map(create_filter).collect()))
        }
    }
}
