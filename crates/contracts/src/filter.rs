//! Filter trait - three-valued event predicate

use serde::{Deserialize, Serialize};

use crate::LogEvent;

/// Outcome of evaluating a filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterResult {
    /// Event should be processed, skipping further filters
    Accept,
    /// Event should be dropped
    Deny,
    /// No opinion
    #[default]
    Neutral,
}

/// Event filter
///
/// Filters are shared across threads, so evaluation takes `&self`.
/// Lifecycle methods default to a stateless, always-started filter.
pub trait Filter: Send + Sync {
    /// Evaluate the event
    fn filter(&self, event: &LogEvent) -> FilterResult;

    /// Start the filter
    fn start(&self) {}

    /// Stop the filter
    fn stop(&self) {}

    /// Whether the filter is started
    fn is_started(&self) -> bool {
        true
    }
}

/// Capability of components carrying their own filter
pub trait Filterable {
    /// True if the component's own filter rejects the event
    fn is_filtered(&self, event: &LogEvent) -> bool;
}
