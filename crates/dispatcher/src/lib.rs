//! # Dispatcher
//!
//! Appender delivery module.
//!
//! Responsibilities:
//! - Gate each event in front of one appender (`DispatchGate`)
//! - Contain appender failures: report them, then swallow or propagate one
//!   canonical error
//! - Reject re-entrant delivery from inside an appender on the same thread
//! - Build appenders and gates from a `DeliveryBlueprint`

pub mod appenders;
pub mod dispatcher;
pub mod error;
pub mod error_handler;
pub mod filters;
pub mod gate;
pub mod lifecycle;
pub mod metrics;

pub use contracts::{Appender, LogEvent};
pub use dispatcher::{create_dispatcher, DispatchSummary, Dispatcher, DispatcherBuilder};
pub use error::{AppenderPanic, DispatcherError};
pub use error_handler::DefaultErrorHandler;
pub use gate::{Delivery, DispatchGate, Suppression};
pub use metrics::{GateMetrics, MetricsSnapshot};
