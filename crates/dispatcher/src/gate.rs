//! DispatchGate - decides whether an event reaches one appender
//!
//! Checks run in a fixed order and short-circuit:
//!
//! 1. gate filter (`Deny` suppresses)
//! 2. level threshold
//! 3. re-entrancy on the current thread (reported)
//! 4. appender lifecycle (failure)
//! 5. appender's own filter
//! 6. guarded `append` (failure)
//!
//! Every failure is reported through the appender's error handler, then either
//! swallowed or returned as an [`AppenderLoggingError`] depending on
//! [`Appender::ignore_exceptions`].

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contracts::{
    AppendError, Appender, AppenderLoggingError, Filter, FilterResult, Level, LogEvent,
};
use tracing::{debug, trace};

use crate::error::AppenderPanic;
use crate::lifecycle::LifeCycle;
use crate::metrics::GateMetrics;

const RECURSIVE_CALL: &str = "Recursive call to appender ";
const NOT_STARTED: &str = "Attempted to append to non-started appender ";
const APPEND_FAILED: &str = "An exception occurred processing appender ";

static NEXT_GATE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Gates currently inside their guarded section on this thread
    static ACTIVE_GATES: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

/// Marks a gate as active on the current thread until dropped
struct RecursionGuard {
    gate_id: u64,
}

impl RecursionGuard {
    /// Returns `None` if the gate is already active on this thread
    fn enter(gate_id: u64) -> Option<Self> {
        ACTIVE_GATES.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&gate_id) {
                None
            } else {
                active.push(gate_id);
                Some(Self { gate_id })
            }
        })
    }
}

impl Drop for RecursionGuard {
    fn drop(&mut self) {
        let gate_id = self.gate_id;
        // try_with: the thread-local may already be gone during thread teardown
        let _ = ACTIVE_GATES.try_with(|active| {
            active.borrow_mut().retain(|id| *id != gate_id);
        });
    }
}

/// Outcome of a delivery that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// `append` ran and succeeded
    Appended,
    /// `append` was not invoked, or its failure was swallowed
    Suppressed(Suppression),
}

impl Delivery {
    /// Whether the appender received the event
    pub fn is_appended(&self) -> bool {
        matches!(self, Delivery::Appended)
    }
}

/// Why an event did not reach the appender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Gate filter returned `Deny`
    FilterDenied,
    /// Event less severe than the gate threshold
    BelowThreshold,
    /// Re-entrant call on the same thread
    Recursive,
    /// Appender not started; failure swallowed
    NotStarted,
    /// Appender's own filter rejected the event
    AppenderFiltered,
    /// `append` failed; failure swallowed
    AppendFailed,
}

impl Suppression {
    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Suppression::FilterDenied => "filter_denied",
            Suppression::BelowThreshold => "below_threshold",
            Suppression::Recursive => "recursive",
            Suppression::NotStarted => "not_started",
            Suppression::AppenderFiltered => "appender_filtered",
            Suppression::AppendFailed => "append_failed",
        }
    }
}

/// Failure raised inside the guarded section
enum Failure {
    NotStarted,
    Append(AppendError),
}

/// Gate in front of a single appender
///
/// Shared between threads; the only mutable state is the per-thread
/// re-entrancy marker and the metrics counters.
pub struct DispatchGate {
    id: u64,
    appender: Arc<dyn Appender>,
    level: Option<Level>,
    filter: Option<Arc<dyn Filter>>,
    lifecycle: LifeCycle,
    metrics: GateMetrics,
}

impl DispatchGate {
    /// Create a gate and start its filter
    pub fn new(
        appender: Arc<dyn Appender>,
        level: Option<Level>,
        filter: Option<Arc<dyn Filter>>,
    ) -> Self {
        let gate = Self {
            id: NEXT_GATE_ID.fetch_add(1, Ordering::Relaxed),
            appender,
            level,
            filter,
            lifecycle: LifeCycle::new(),
            metrics: GateMetrics::new(),
        };
        gate.start();
        gate
    }

    /// Target appender
    pub fn appender(&self) -> &Arc<dyn Appender> {
        &self.appender
    }

    /// Appender name
    pub fn name(&self) -> &str {
        self.appender.name()
    }

    /// Threshold, if any
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    /// Gate filter, if any
    pub fn filter(&self) -> Option<&Arc<dyn Filter>> {
        self.filter.as_ref()
    }

    /// Whether a gate filter is configured
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Delivery counters
    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    /// Start the gate filter
    pub fn start(&self) {
        if self.lifecycle.start() {
            if let Some(filter) = &self.filter {
                filter.start();
            }
        }
    }

    /// Stop the gate filter; the appender is left untouched
    pub fn stop(&self) {
        if self.lifecycle.stop() {
            if let Some(filter) = &self.filter {
                filter.stop();
            }
        }
    }

    /// Whether the gate is started
    pub fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }

    /// Deliver an event to the appender
    ///
    /// # Errors
    /// Returns the delivery failure when the appender is not started or its
    /// `append` failed, unless the appender ignores exceptions. The failure has
    /// already been reported through the appender's error handler.
    pub fn deliver(&self, event: &LogEvent) -> Result<Delivery, AppenderLoggingError> {
        if self.is_filtered_by_gate(event) {
            return Ok(self.suppressed(Suppression::FilterDenied, event));
        }
        if self.is_filtered_by_level(event) {
            return Ok(self.suppressed(Suppression::BelowThreshold, event));
        }
        let Some(_guard) = RecursionGuard::enter(self.id) else {
            self.metrics.inc_recursive();
            self.report(&self.error_message(RECURSIVE_CALL), None);
            return Ok(Delivery::Suppressed(Suppression::Recursive));
        };
        self.deliver_guarded(event)
    }

    fn is_filtered_by_gate(&self, event: &LogEvent) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.filter(event) == FilterResult::Deny)
    }

    fn is_filtered_by_level(&self, event: &LogEvent) -> bool {
        self.level
            .is_some_and(|level| level.int_level() < event.level.int_level())
    }

    fn is_filtered_by_appender(&self, event: &LogEvent) -> bool {
        self.appender
            .as_filterable()
            .is_some_and(|filterable| filterable.is_filtered(event))
    }

    fn deliver_guarded(&self, event: &LogEvent) -> Result<Delivery, AppenderLoggingError> {
        if !self.appender.is_started() {
            return self.handle_failure(Failure::NotStarted);
        }
        if self.is_filtered_by_appender(event) {
            return Ok(self.suppressed(Suppression::AppenderFiltered, event));
        }
        match panic::catch_unwind(AssertUnwindSafe(|| self.appender.append(event))) {
            Ok(Ok(())) => {
                self.metrics.inc_appended();
                Ok(Delivery::Appended)
            }
            Ok(Err(err)) => self.handle_failure(Failure::Append(err)),
            Err(payload) => {
                let err = AppendError::other(AppenderPanic::from_payload(payload));
                self.handle_failure(Failure::Append(err))
            }
        }
    }

    fn handle_failure(&self, failure: Failure) -> Result<Delivery, AppenderLoggingError> {
        self.metrics.inc_failed();
        let (message, suppression, cause) = match failure {
            Failure::NotStarted => (
                self.error_message(NOT_STARTED),
                Suppression::NotStarted,
                None,
            ),
            Failure::Append(err) => (
                self.error_message(APPEND_FAILED),
                Suppression::AppendFailed,
                Some(err),
            ),
        };
        self.report(&message, cause.as_ref().map(AppendError::as_cause));

        if self.appender.ignore_exceptions() {
            debug!(
                appender = %self.name(),
                reason = suppression.as_str(),
                "Delivery failure ignored"
            );
            return Ok(Delivery::Suppressed(suppression));
        }

        Err(match cause {
            Some(AppendError::Logging(err)) => err,
            Some(AppendError::Other(err)) => {
                AppenderLoggingError::for_appender(self.name(), message, Some(err))
            }
            None => AppenderLoggingError::for_appender(self.name(), message, None),
        })
    }

    fn suppressed(&self, reason: Suppression, event: &LogEvent) -> Delivery {
        self.metrics.inc_suppressed();
        trace!(
            appender = %self.name(),
            level = %event.level,
            reason = reason.as_str(),
            "Event suppressed"
        );
        Delivery::Suppressed(reason)
    }

    fn report(&self, message: &str, cause: Option<&(dyn std::error::Error + 'static)>) {
        self.appender.handler().error(message, cause);
    }

    fn error_message(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.name())
    }
}

impl fmt::Debug for DispatchGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchGate")
            .field("appender", &self.name())
            .field("level", &self.level)
            .field("has_filter", &self.has_filter())
            .field("started", &self.is_started())
            .finish()
    }
}
