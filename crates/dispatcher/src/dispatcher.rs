//! Dispatcher - runs every configured gate for each event

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{
    Appender, AppenderConfig, AppenderKind, AppenderLoggingError, DeliveryBlueprint,
    ErrorHandler, LogEvent,
};
use tracing::{debug, info, instrument, warn};

use crate::appenders::{AppenderCore, FileAppender, MemoryAppender, TracingAppender};
use crate::error::DispatcherError;
use crate::filters::create_filter;
use crate::gate::{Delivery, DispatchGate};
use crate::metrics::MetricsSnapshot;

/// Result of dispatching one event to every gate
#[derive(Debug, Default)]
pub struct DispatchSummary {
    /// Gates whose appender received the event
    pub appended: usize,
    /// Gates that suppressed the event (including swallowed failures)
    pub suppressed: usize,
    /// Failures propagated by gates
    pub failures: Vec<AppenderLoggingError>,
}

impl DispatchSummary {
    /// Whether no gate propagated a failure
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    blueprint: DeliveryBlueprint,
    handler: Option<Arc<dyn ErrorHandler>>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(blueprint: DeliveryBlueprint) -> Self {
        Self {
            blueprint,
            handler: None,
        }
    }

    /// Use one error handler for every appender instead of the default
    pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Create and start appenders, then build a gate per configured reference
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(
            appender_count = self.blueprint.appenders.len(),
            gate_count = self.blueprint.gates.len()
        )
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let mut appenders: Vec<Arc<dyn Appender>> = Vec::with_capacity(self.blueprint.appenders.len());
        let mut memory = HashMap::new();

        for config in &self.blueprint.appenders {
            let appender = match config.kind {
                AppenderKind::Memory => {
                    let appender = Arc::new(MemoryAppender::new(self.core_for(config)));
                    memory.insert(config.name.clone(), Arc::clone(&appender));
                    appender as Arc<dyn Appender>
                }
                _ => create_appender(config, self.core_for(config))?,
            };
            appender
                .start()
                .map_err(|source| DispatcherError::AppenderStart {
                    name: config.name.clone(),
                    source,
                })?;
            appenders.push(appender);
        }

        let mut gates = Vec::with_capacity(self.blueprint.gates.len());
        for gate_config in &self.blueprint.gates {
            let appender = appenders
                .iter()
                .find(|a| a.name() == gate_config.appender)
                .cloned()
                .ok_or_else(|| DispatcherError::UnknownAppender {
                    name: gate_config.appender.clone(),
                })?;
            let filter = gate_config.filter.as_ref().map(create_filter);
            gates.push(DispatchGate::new(appender, gate_config.level, filter));
        }

        info!(
            appenders = appenders.len(),
            gates = gates.len(),
            "Dispatcher built"
        );

        Ok(Dispatcher {
            appenders,
            gates,
            memory,
        })
    }

    fn core_for(&self, config: &AppenderConfig) -> AppenderCore {
        let mut core =
            AppenderCore::new(&config.name).with_ignore_exceptions(config.ignore_exceptions);
        if let Some(filter) = &config.filter {
            core = core.with_filter(create_filter(filter));
        }
        if let Some(handler) = &self.handler {
            core = core.with_handler(Arc::clone(handler));
        }
        core
    }
}

/// Create a non-memory appender from configuration
#[instrument(
    name = "dispatcher_create_appender",
    skip(config, core),
    fields(appender = %config.name, kind = ?config.kind)
)]
fn create_appender(
    config: &AppenderConfig,
    core: AppenderCore,
) -> Result<Arc<dyn Appender>, DispatcherError> {
    match config.kind {
        AppenderKind::Tracing => Ok(Arc::new(TracingAppender::new(core))),
        AppenderKind::File => Ok(Arc::new(FileAppender::from_params(core, &config.params)?)),
        AppenderKind::Memory => Ok(Arc::new(MemoryAppender::new(core))),
    }
}

/// Owns the appenders and the gates in front of them
pub struct Dispatcher {
    appenders: Vec<Arc<dyn Appender>>,
    gates: Vec<DispatchGate>,
    memory: HashMap<String, Arc<MemoryAppender>>,
}

impl Dispatcher {
    /// Create a dispatcher from prebuilt gates (appenders must already be started)
    pub fn with_gates(gates: Vec<DispatchGate>) -> Self {
        let mut appenders: Vec<Arc<dyn Appender>> = Vec::new();
        for gate in &gates {
            if !appenders.iter().any(|a| Arc::ptr_eq(a, gate.appender())) {
                appenders.push(Arc::clone(gate.appender()));
            }
        }
        Self {
            appenders,
            gates,
            memory: HashMap::new(),
        }
    }

    /// Configured gates
    pub fn gates(&self) -> &[DispatchGate] {
        &self.gates
    }

    /// Look up an appender by name
    pub fn appender(&self, name: &str) -> Option<&Arc<dyn Appender>> {
        self.appenders.iter().find(|a| a.name() == name)
    }

    /// Look up a memory appender by name
    pub fn memory_appender(&self, name: &str) -> Option<&Arc<MemoryAppender>> {
        self.memory.get(name)
    }

    /// Get metrics for all gates
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.gates
            .iter()
            .map(|g| (g.name().to_string(), g.metrics().snapshot()))
            .collect()
    }

    /// Deliver the event through every gate
    ///
    /// A failing gate does not stop later gates from running.
    pub fn dispatch(&self, event: &LogEvent) -> DispatchSummary {
        self.dispatch_observed(event, |_, _| {})
    }

    /// Like [`Dispatcher::dispatch`], handing every gate outcome to `observe` first
    pub fn dispatch_observed<F>(&self, event: &LogEvent, mut observe: F) -> DispatchSummary
    where
        F: FnMut(&DispatchGate, &Result<Delivery, AppenderLoggingError>),
    {
        let mut summary = DispatchSummary::default();
        for gate in &self.gates {
            let outcome = gate.deliver(event);
            observe(gate, &outcome);
            match outcome {
                Ok(Delivery::Appended) => summary.appended += 1,
                Ok(Delivery::Suppressed(_)) => summary.suppressed += 1,
                Err(err) => {
                    warn!(appender = %gate.name(), error = %err, "Delivery failed");
                    summary.failures.push(err);
                }
            }
        }
        summary
    }

    /// Stop every gate, then every appender
    #[instrument(name = "dispatcher_stop", skip(self))]
    pub fn stop(&self) {
        for gate in &self.gates {
            gate.stop();
        }
        for appender in &self.appenders {
            appender.stop();
            debug!(appender = %appender.name(), "Appender stopped");
        }
        info!("Dispatcher stopped");
    }
}

/// Convenience function to create a dispatcher from a blueprint
pub fn create_dispatcher(blueprint: DeliveryBlueprint) -> Result<Dispatcher, DispatcherError> {
    DispatcherBuilder::new(blueprint).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ConfigVersion, FilterConfig, FilterResult, GateConfig, Level};

    fn memory_config(name: &str) -> AppenderConfig {
        AppenderConfig {
            name: name.to_string(),
            kind: AppenderKind::Memory,
            ignore_exceptions: true,
            filter: None,
            params: HashMap::new(),
        }
    }

    fn gate(appender: &str, level: Option<Level>) -> GateConfig {
        GateConfig {
            appender: appender.to_string(),
            level,
            filter: None,
        }
    }

    #[test]
    fn test_dispatch_respects_per_gate_thresholds() {
        let blueprint = DeliveryBlueprint {
            version: ConfigVersion::V1,
            appenders: vec![memory_config("all"), memory_config("errors")],
            gates: vec![gate("all", None), gate("errors", Some(Level::Error))],
        };
        let dispatcher = create_dispatcher(blueprint).unwrap();

        let summary = dispatcher.dispatch(&LogEvent::new(Level::Info, "app", "hello"));
        assert_eq!(summary.appended, 1);
        assert_eq!(summary.suppressed, 1);
        assert!(summary.is_ok());

        let summary = dispatcher.dispatch(&LogEvent::new(Level::Error, "app", "boom"));
        assert_eq!(summary.appended, 2);

        assert_eq!(dispatcher.memory_appender("all").unwrap().len(), 2);
        assert_eq!(dispatcher.memory_appender("errors").unwrap().len(), 1);
    }

    #[test]
    fn test_gate_and_appender_filters_from_config() {
        let mut appender = memory_config("audit");
        appender.filter = Some(FilterConfig::LoggerName {
            prefix: "audit".into(),
            on_match: FilterResult::Neutral,
            on_mismatch: FilterResult::Deny,
        });
        let mut gate_config = gate("audit", None);
        gate_config.filter = Some(FilterConfig::Threshold {
            level: Level::Warn,
            on_match: FilterResult::Neutral,
            on_mismatch: FilterResult::Deny,
        });
        let blueprint = DeliveryBlueprint {
            version: ConfigVersion::V1,
            appenders: vec![appender],
            gates: vec![gate_config],
        };
        let dispatcher = create_dispatcher(blueprint).unwrap();

        dispatcher.dispatch(&LogEvent::new(Level::Info, "audit.login", "denied by gate"));
        dispatcher.dispatch(&LogEvent::new(Level::Warn, "app", "denied by appender"));
        dispatcher.dispatch(&LogEvent::new(Level::Warn, "audit.login", "kept"));

        let events = dispatcher.memory_appender("audit").unwrap().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "kept");
        assert_eq!(dispatcher.metrics()[0].1.suppressed, 2);
    }

    #[test]
    fn test_unknown_appender_reference() {
        let blueprint = DeliveryBlueprint {
            version: ConfigVersion::V1,
            appenders: vec![memory_config("mem")],
            gates: vec![gate("missing", None)],
        };
        let err = create_dispatcher(blueprint).err().unwrap();
        assert!(matches!(err, DispatcherError::UnknownAppender { .. }));
    }

    #[test]
    fn test_stopped_appender_is_reported_not_delivered() {
        let blueprint = DeliveryBlueprint {
            version: ConfigVersion::V1,
            appenders: vec![memory_config("mem")],
            gates: vec![gate("mem", None)],
        };
        let dispatcher = create_dispatcher(blueprint).unwrap();
        dispatcher.stop();

        let summary = dispatcher.dispatch(&LogEvent::new(Level::Info, "app", "late"));
        assert_eq!(summary.suppressed, 1);
        assert!(summary.is_ok());
        assert!(dispatcher.memory_appender("mem").unwrap().is_empty());
        assert_eq!(dispatcher.metrics()[0].1.failed, 1);
    }

    #[test]
    fn test_dispatch_observed_sees_every_gate() {
        let blueprint = DeliveryBlueprint {
            version: ConfigVersion::V1,
            appenders: vec![memory_config("a"), memory_config("b")],
            gates: vec![gate("a", None), gate("b", Some(Level::Fatal))],
        };
        let dispatcher = create_dispatcher(blueprint).unwrap();

        let mut seen = Vec::new();
        let summary = dispatcher.dispatch_observed(
            &LogEvent::new(Level::Warn, "app", "observed"),
            |gate, outcome| {
                seen.push((gate.name().to_string(), matches!(outcome, Ok(Delivery::Appended))))
            },
        );
        assert_eq!(summary.appended, 1);
        assert_eq!(
            seen,
            vec![("a".to_string(), true), ("b".to_string(), false)]
        );
    }

    #[test]
    fn test_with_gates_deduplicates_appenders() {
        let appender = Arc::new(MemoryAppender::new(AppenderCore::new("mem")));
        appender.start().unwrap();
        let dispatcher = Dispatcher::with_gates(vec![
            DispatchGate::new(appender.clone(), None, None),
            DispatchGate::new(appender.clone(), Some(Level::Error), None),
        ]);

        assert_eq!(dispatcher.gates().len(), 2);
        assert!(dispatcher.appender("mem").is_some());
        let summary = dispatcher.dispatch(&LogEvent::new(Level::Error, "app", "twice"));
        assert_eq!(summary.appended, 2);
        assert_eq!(appender.len(), 2);
    }
}
