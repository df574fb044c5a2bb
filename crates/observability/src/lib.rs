//! # Observability
//!
//! Log output and delivery metrics for processes that drive dispatch gates.
//!
//! Every gate outcome ends up as one increment of `gate_deliveries_total`,
//! labelled with the appender name and one of `appended`, `suppressed` or
//! `failed`. Dispatch latency and per-level event counts are recorded next to
//! it. The counters go through the `metrics` facade, so they are no-ops until
//! [`serve_delivery_metrics`] installs the Prometheus exporter.
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig::for_verbosity(1, false))?;
//! observability::serve_delivery_metrics(9000)?;
//!
//! let summary = dispatcher.dispatch(&event);
//! metrics::record_event_dispatched(event.level);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    describe_delivery_metrics, record_delivery, record_dispatch_latency_us,
    record_event_dispatched, DeliveryAggregator, DeliverySummary, RunningStats, StatsSummary,
};

/// Subscriber and exporter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Serve delivery metrics on this port
    pub metrics_port: Option<u16>,
}

impl ObservabilityConfig {
    /// Map `-v`/`-q` style flags to a filter directive
    ///
    /// `quiet` wins. Gate suppressions are logged at `trace`, so they only
    /// show up from two `-v` on.
    pub fn for_verbosity(verbose: u8, quiet: bool) -> Self {
        let log_filter = match (quiet, verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        Self {
            log_filter: log_filter.to_string(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            log_filter: "info".to_string(),
            metrics_port: None,
        }
    }
}

/// Subscriber output format
///
/// `Json` includes thread ids and names, which is what ties a
/// "Recursive call" report to the thread that re-entered the gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

/// Install the tracing subscriber, then the exporter if a port is set
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().with_thread_names(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        serve_delivery_metrics(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        log_filter = %config.log_filter,
        "Tracing subscriber installed"
    );
    Ok(())
}

/// Install the Prometheus exporter on `0.0.0.0:port` and describe the
/// delivery metrics
///
/// Usable without [`init_with_config`] when tracing is already set up.
pub fn serve_delivery_metrics(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;
    describe_delivery_metrics();

    tracing::info!(port, "Delivery metrics served");
    Ok(())
}
