//! MemoryAppender - keeps delivered events in memory

use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{AppendError, Appender, LogEvent};

use super::AppenderCore;

/// Appender capturing events, for inspection by tests and tooling
#[derive(Debug)]
pub struct MemoryAppender {
    core: AppenderCore,
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryAppender {
    /// Create a new MemoryAppender
    pub fn new(core: AppenderCore) -> Self {
        Self {
            core,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Copy of every captured event, oldest first
    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    /// Number of captured events
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return every captured event
    pub fn take(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Appender for MemoryAppender {
    delegate_appender_core!();

    fn append(&self, event: &LogEvent) -> Result<(), AppendError> {
        self.lock().push(event.clone());
        Ok(())
    }

    fn start(&self) -> Result<(), AppendError> {
        self.core.mark_started();
        Ok(())
    }

    fn stop(&self) {
        self.core.mark_stopped();
    }
}
