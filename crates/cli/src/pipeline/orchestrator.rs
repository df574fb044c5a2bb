//! Load runner - drives synthetic events through the dispatcher.
//!
//! Every worker runs on tokio's blocking pool and calls the gates
//! synchronously, so gates on different threads deliver concurrently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{DeliveryBlueprint, Level, LogEvent};
use dispatcher::{create_dispatcher, Delivery, Dispatcher};
use observability::metrics::{OUTCOME_APPENDED, OUTCOME_FAILED, OUTCOME_SUPPRESSED};
use observability::{
    record_delivery, record_dispatch_latency_us, record_event_dispatched, DeliveryAggregator,
};
use tracing::{debug, info, warn};

use super::RunStats;
use crate::error::CliError;

/// Levels cycled through when no fixed level is requested
const CYCLE_LEVELS: [Level; 6] = [
    Level::Fatal,
    Level::Error,
    Level::Warn,
    Level::Info,
    Level::Debug,
    Level::Trace,
];

/// Logger names cycled through so name-based filters see a mix
const LOGGER_NAMES: [&str; 3] = ["app", "app.db", "audit.login"];

/// Load run configuration
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// The delivery blueprint
    pub blueprint: DeliveryBlueprint,

    /// Events delivered by each worker
    pub events_per_worker: u64,

    /// Number of blocking workers
    pub workers: usize,

    /// Fixed event level (None = cycle)
    pub level: Option<Level>,

    /// Run timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Drives synthetic events through every configured gate
pub struct LoadRunner {
    config: LoadConfig,
    shutdown: Arc<AtomicBool>,
}

impl LoadRunner {
    /// Create a runner with the given configuration
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that makes workers stop after their current event
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run every worker to completion and collect statistics
    pub async fn run(self) -> Result<RunStats> {
        if self.config.workers == 0 {
            return Err(CliError::invalid_args("--threads must be at least 1").into());
        }

        if let Some(port) = self.config.metrics_port {
            observability::serve_delivery_metrics(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let dispatcher = Arc::new(
            create_dispatcher(self.config.blueprint.clone())
                .context("Failed to create dispatcher")?,
        );
        info!(
            gates = dispatcher.gates().len(),
            workers = self.config.workers,
            events_per_worker = self.config.events_per_worker,
            "Dispatcher ready"
        );

        if let Some(timeout) = self.config.timeout {
            let shutdown = Arc::clone(&self.shutdown);
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                warn!(timeout_secs = timeout.as_secs(), "Run timeout reached");
                shutdown.store(true, Ordering::Relaxed);
            });
        }

        let start_time = Instant::now();
        let mut handles = Vec::with_capacity(self.config.workers);
        for index in 0..self.config.workers {
            let dispatcher = Arc::clone(&dispatcher);
            let shutdown = Arc::clone(&self.shutdown);
            let events = self.config.events_per_worker;
            let level = self.config.level;
            handles.push(tokio::task::spawn_blocking(move || {
                run_worker(index, &dispatcher, events, level, &shutdown)
            }));
        }

        let mut delivery = DeliveryAggregator::new();
        for (index, handle) in handles.into_iter().enumerate() {
            let worker_stats = handle
                .await
                .map_err(|e| CliError::worker(index, e.to_string()))?;
            delivery.merge(&worker_stats);
        }

        let stats = RunStats {
            duration: start_time.elapsed(),
            workers: self.config.workers,
            delivery,
            gates: dispatcher.metrics(),
        };

        dispatcher.stop();
        Ok(stats)
    }
}

/// Deliver `events` synthetic events from the current thread
fn run_worker(
    index: usize,
    dispatcher: &Dispatcher,
    events: u64,
    level: Option<Level>,
    shutdown: &AtomicBool,
) -> DeliveryAggregator {
    let mut stats = DeliveryAggregator::new();
    for seq in 0..events {
        if shutdown.load(Ordering::Relaxed) {
            debug!(worker = index, delivered = seq, "Worker stopping early");
            break;
        }
        let event = synthetic_event(index, seq, level);
        let started = Instant::now();
        let summary = dispatcher.dispatch_observed(&event, |gate, outcome| {
            let label = match outcome {
                Ok(Delivery::Appended) => OUTCOME_APPENDED,
                Ok(Delivery::Suppressed(_)) => OUTCOME_SUPPRESSED,
                Err(_) => OUTCOME_FAILED,
            };
            record_delivery(gate.name(), label);
        });
        let latency_us = started.elapsed().as_secs_f64() * 1_000_000.0;

        record_event_dispatched(event.level);
        record_dispatch_latency_us(latency_us);
        stats.update(
            summary.appended as u64,
            summary.suppressed as u64,
            summary.failures.len() as u64,
            latency_us,
        );
    }
    debug!(worker = index, events = stats.total_events, "Worker finished");
    stats
}

fn synthetic_event(worker: usize, seq: u64, level: Option<Level>) -> LogEvent {
    let slot = seq as usize;
    let level = level.unwrap_or(CYCLE_LEVELS[slot % CYCLE_LEVELS.len()]);
    let logger = LOGGER_NAMES[slot % LOGGER_NAMES.len()];
    let mut event = LogEvent::new(level, logger, format!("synthetic event {worker}-{seq}"));
    event.thread_name = Some(format!("gate-worker-{worker}"));
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AppenderConfig, AppenderKind, ConfigVersion, GateConfig};
    use std::collections::HashMap;

    fn blueprint(gate_level: Option<Level>) -> DeliveryBlueprint {
        DeliveryBlueprint {
            version: ConfigVersion::V1,
            appenders: vec![AppenderConfig {
                name: "mem".into(),
                kind: AppenderKind::Memory,
                ignore_exceptions: true,
                filter: None,
                params: HashMap::new(),
            }],
            gates: vec![GateConfig {
                appender: "mem".into(),
                level: gate_level,
                filter: None,
            }],
        }
    }

    fn config(gate_level: Option<Level>, level: Option<Level>) -> LoadConfig {
        LoadConfig {
            blueprint: blueprint(gate_level),
            events_per_worker: 12,
            workers: 3,
            level,
            timeout: None,
            metrics_port: None,
        }
    }

    #[test]
    fn test_synthetic_event_cycles_levels() {
        assert_eq!(synthetic_event(0, 0, None).level, Level::Fatal);
        assert_eq!(synthetic_event(0, 5, None).level, Level::Trace);
        assert_eq!(synthetic_event(0, 6, None).level, Level::Fatal);
        assert_eq!(synthetic_event(0, 5, Some(Level::Info)).level, Level::Info);
        assert_eq!(
            synthetic_event(2, 1, None).thread_name.as_deref(),
            Some("gate-worker-2")
        );
    }

    #[tokio::test]
    async fn test_run_delivers_from_every_worker() {
        let stats = LoadRunner::new(config(None, None)).run().await.unwrap();
        assert_eq!(stats.workers, 3);
        assert_eq!(stats.delivery.total_events, 36);
        assert_eq!(stats.delivery.appended, 36);
        assert_eq!(stats.gates.len(), 1);
        assert_eq!(stats.gates[0].1.appended, 36);
    }

    #[tokio::test]
    async fn test_run_applies_gate_threshold() {
        // 12 events per worker cycle 6 levels twice: FATAL, ERROR and WARN pass
        let stats = LoadRunner::new(config(Some(Level::Warn), None))
            .run()
            .await
            .unwrap();
        assert_eq!(stats.delivery.appended, 18);
        assert_eq!(stats.delivery.suppressed, 18);
    }

    #[tokio::test]
    async fn test_shutdown_flag_stops_workers() {
        let runner = LoadRunner::new(config(None, Some(Level::Error)));
        runner.shutdown_flag().store(true, Ordering::Relaxed);
        let stats = runner.run().await.unwrap();
        assert_eq!(stats.delivery.total_events, 0);
    }

    #[tokio::test]
    async fn test_zero_workers_rejected() {
        let mut cfg = config(None, None);
        cfg.workers = 0;
        assert!(LoadRunner::new(cfg).run().await.is_err());
    }
}
