//! State shared by the built-in appenders

use std::fmt;
use std::sync::Arc;

use contracts::{ErrorHandler, Filter, FilterResult, Filterable, LogEvent};

use crate::error_handler::DefaultErrorHandler;
use crate::lifecycle::LifeCycle;

/// Name, failure policy, handler, own filter and lifecycle of an appender
pub struct AppenderCore {
    name: String,
    ignore_exceptions: bool,
    handler: Arc<dyn ErrorHandler>,
    filter: Option<Arc<dyn Filter>>,
    lifecycle: LifeCycle,
}

impl AppenderCore {
    /// Create a core that ignores exceptions and reports through a
    /// [`DefaultErrorHandler`]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            handler: Arc::new(DefaultErrorHandler::new(name.clone())),
            name,
            ignore_exceptions: true,
            filter: None,
            lifecycle: LifeCycle::new(),
        }
    }

    /// Set whether delivery failures are swallowed
    pub fn with_ignore_exceptions(mut self, ignore: bool) -> Self {
        self.ignore_exceptions = ignore;
        self
    }

    /// Attach the appender's own filter
    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Replace the error handler
    pub fn with_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ignores_exceptions(&self) -> bool {
        self.ignore_exceptions
    }

    pub fn handler(&self) -> &dyn ErrorHandler {
        self.handler.as_ref()
    }

    pub fn filter(&self) -> Option<&Arc<dyn Filter>> {
        self.filter.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }

    /// Filtering capability, present only when a filter is attached
    pub fn as_filterable(&self) -> Option<&dyn Filterable> {
        self.filter.as_ref().map(|_| self as &dyn Filterable)
    }

    /// Mark started and start the own filter; false if already started
    pub fn mark_started(&self) -> bool {
        let changed = self.lifecycle.start();
        if changed {
            if let Some(filter) = &self.filter {
                filter.start();
            }
        }
        changed
    }

    /// Mark stopped and stop the own filter; false if already stopped
    pub fn mark_stopped(&self) -> bool {
        let changed = self.lifecycle.stop();
        if changed {
            if let Some(filter) = &self.filter {
                filter.stop();
            }
        }
        changed
    }
}

impl Filterable for AppenderCore {
    fn is_filtered(&self, event: &LogEvent) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.filter(event) == FilterResult::Deny)
    }
}

impl fmt::Debug for AppenderCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppenderCore")
            .field("name", &self.name)
            .field("ignore_exceptions", &self.ignore_exceptions)
            .field("has_filter", &self.filter.is_some())
            .field("started", &self.is_started())
            .finish()
    }
}
