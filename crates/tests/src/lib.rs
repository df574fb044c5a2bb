//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 → Dispatcher → Appender 端到端测试
//! - 跨线程与重入行为

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex, OnceLock};

    use contracts::{AppendError, Appender, ErrorHandler, LogEvent};
    use dispatcher::gate::DispatchGate;
    use dispatcher::lifecycle::LifeCycle;

    /// Handler capturing every report
    #[derive(Default)]
    pub struct CollectingHandler {
        reports: Mutex<Vec<(String, Option<String>)>>,
    }

    impl CollectingHandler {
        pub fn reports(&self) -> Vec<(String, Option<String>)> {
            self.reports.lock().unwrap().clone()
        }
    }

    impl ErrorHandler for CollectingHandler {
        fn error(&self, message: &str, cause: Option<&(dyn std::error::Error + 'static)>) {
            self.reports
                .lock()
                .unwrap()
                .push((message.to_string(), cause.map(|c| c.to_string())));
        }
    }

    /// Appender whose `append` goes back through its own gate once
    pub struct EchoAppender {
        pub gate: OnceLock<Arc<DispatchGate>>,
        pub handler: CollectingHandler,
        pub seen: Mutex<Vec<String>>,
        lifecycle: LifeCycle,
    }

    impl EchoAppender {
        pub fn new() -> Self {
            Self {
                gate: OnceLock::new(),
                handler: CollectingHandler::default(),
                seen: Mutex::new(Vec::new()),
                lifecycle: LifeCycle::new(),
            }
        }
    }

    impl Appender for EchoAppender {
        fn name(&self) -> &str {
            "echo"
        }

        fn append(&self, event: &LogEvent) -> Result<(), AppendError> {
            self.seen.lock().unwrap().push(event.message.clone());
            if let Some(gate) = self.gate.get() {
                let echo = LogEvent::new(event.level, "echo", format!("echo of {}", event.message));
                let outcome = gate.deliver(&echo);
                assert!(outcome.is_ok());
            }
            Ok(())
        }

        fn start(&self) -> Result<(), AppendError> {
            self.lifecycle.start();
            Ok(())
        }

        fn stop(&self) {
            self.lifecycle.stop();
        }

        fn is_started(&self) -> bool {
            self.lifecycle.is_started()
        }

        fn ignore_exceptions(&self) -> bool {
            true
        }

        fn handler(&self) -> &dyn ErrorHandler {
            &self.handler
        }
    }

    /// Appender failing every `append` with an I/O error
    pub struct BrokenAppender {
        pub name: String,
        pub ignore: bool,
        pub handler: CollectingHandler,
    }

    impl Appender for BrokenAppender {
        fn name(&self) -> &str {
            &self.name
        }

        fn append(&self, _event: &LogEvent) -> Result<(), AppendError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn start(&self) -> Result<(), AppendError> {
            Ok(())
        }

        fn stop(&self) {}

        fn is_started(&self) -> bool {
            true
        }

        fn ignore_exceptions(&self) -> bool {
            self.ignore
        }

        fn handler(&self) -> &dyn ErrorHandler {
            &self.handler
        }
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{Level, LogEvent};

    #[test]
    fn test_level_ordering_matches_int_levels() {
        assert!(Level::Error.is_more_specific_than(Level::Warn));
        assert!(Level::Trace.is_less_specific_than(Level::Debug));
        assert!(Level::Off.int_level() < Level::Fatal.int_level());
        assert_eq!(Level::All.int_level(), i32::MAX);
    }

    #[test]
    fn test_event_json_shape() {
        let event = LogEvent::new(Level::Warn, "app.db", "slow query").with_thrown("timeout");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["logger_name"], "app.db");
        assert_eq!(value["thrown"], "timeout");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Appender, Level, LogEvent};
    use dispatcher::{create_dispatcher, Delivery, DispatchGate, DispatcherBuilder, Suppression};

    use crate::support::{BrokenAppender, CollectingHandler, EchoAppender};

    fn config_with_file(path: &std::path::Path) -> String {
        format!(
            r#"
[[appenders]]
name = "console"
kind = "tracing"

[[appenders]]
name = "errors_file"
kind = "file"
ignore_exceptions = false
[appenders.params]
path = "{}"
append = "false"

[[appenders]]
name = "audit"
kind = "memory"
[appenders.filter]
type = "logger_name"
prefix = "audit"

[[gates]]
appender = "console"
level = "INFO"

[[gates]]
appender = "errors_file"
level = "ERROR"

[[gates]]
appender = "audit"
[gates.filter]
type = "threshold"
level = "WARN"
"#,
            path.display().to_string().replace('\\', "/")
        )
    }

    /// End-to-end: TOML -> ConfigLoader -> Dispatcher -> appenders
    #[test]
    fn test_e2e_config_to_appenders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("errors.jsonl");
        let blueprint =
            ConfigLoader::load_from_str(&config_with_file(&path), ConfigFormat::Toml).unwrap();
        let dispatcher = create_dispatcher(blueprint).unwrap();

        let events = [
            LogEvent::new(Level::Debug, "app", "too verbose for everyone"),
            LogEvent::new(Level::Info, "audit.login", "info is below the audit filter"),
            LogEvent::new(Level::Warn, "audit.login", "suspicious login"),
            LogEvent::new(Level::Error, "app.db", "connection lost"),
            LogEvent::new(Level::Fatal, "audit.db", "audit store gone"),
        ];
        for event in &events {
            assert!(dispatcher.dispatch(event).is_ok());
        }
        dispatcher.stop();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<LogEvent> = written
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].message, "connection lost");
        assert_eq!(lines[1].level, Level::Fatal);

        let audit = dispatcher.memory_appender("audit").unwrap();
        let messages: Vec<String> = audit.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["suspicious login", "audit store gone"]);

        let metrics = dispatcher.metrics();
        assert_eq!(metrics[0].0, "console");
        assert_eq!(metrics[0].1.appended, 4);
        assert_eq!(metrics[0].1.suppressed, 1);
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "appenders": [{{ "name": "mem", "kind": "memory" }}],
                "gates": [{{ "appender": "mem", "level": "warn" }}]
            }}"#
        )
        .unwrap();
        // levels are upper-case on the wire
        assert!(ConfigLoader::load_from_path(file.path()).is_err());

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "appenders": [{{ "name": "mem", "kind": "memory" }}],
                "gates": [{{ "appender": "mem", "level": "WARN" }}]
            }}"#
        )
        .unwrap();
        let blueprint = ConfigLoader::load_from_path(file.path()).unwrap();
        let dispatcher = create_dispatcher(blueprint).unwrap();
        dispatcher.dispatch(&LogEvent::new(Level::Info, "app", "dropped"));
        dispatcher.dispatch(&LogEvent::new(Level::Warn, "app", "kept"));
        assert_eq!(dispatcher.memory_appender("mem").unwrap().len(), 1);
    }

    #[test]
    fn test_stopped_file_appender_propagates_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");
        let blueprint =
            ConfigLoader::load_from_str(&config_with_file(&path), ConfigFormat::Toml).unwrap();
        let dispatcher = create_dispatcher(blueprint).unwrap();
        dispatcher.appender("errors_file").unwrap().stop();

        let summary = dispatcher.dispatch(&LogEvent::new(Level::Error, "app", "after stop"));
        assert_eq!(summary.failures.len(), 1);
        let failure = &summary.failures[0];
        assert_eq!(failure.appender_name(), Some("errors_file"));
        assert_eq!(
            failure.message(),
            "Attempted to append to non-started appender errors_file"
        );
        // the tracing appender still got the event
        assert_eq!(summary.appended, 1);
    }

    #[test]
    fn test_shared_error_handler_receives_every_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");
        let blueprint =
            ConfigLoader::load_from_str(&config_with_file(&path), ConfigFormat::Toml).unwrap();
        let handler = Arc::new(CollectingHandler::default());
        let dispatcher = DispatcherBuilder::new(blueprint)
            .with_error_handler(handler.clone())
            .build()
            .unwrap();
        dispatcher.appender("errors_file").unwrap().stop();
        dispatcher.appender("audit").unwrap().stop();

        dispatcher.dispatch(&LogEvent::new(Level::Error, "audit.login", "denied"));

        let mut messages: Vec<String> = handler.reports().into_iter().map(|(m, _)| m).collect();
        messages.sort();
        assert_eq!(
            messages,
            vec![
                "Attempted to append to non-started appender audit".to_string(),
                "Attempted to append to non-started appender errors_file".to_string(),
            ]
        );
    }

    #[test]
    fn test_reentrant_append_is_rejected_once() {
        let appender = Arc::new(EchoAppender::new());
        appender.start().unwrap();
        let gate = Arc::new(DispatchGate::new(appender.clone(), None, None));
        assert!(appender.gate.set(Arc::clone(&gate)).is_ok());

        let outcome = gate.deliver(&LogEvent::new(Level::Info, "app", "hello"));
        assert_eq!(outcome.unwrap(), Delivery::Appended);
        assert_eq!(*appender.seen.lock().unwrap(), vec!["hello".to_string()]);

        let reports = appender.handler.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "Recursive call to appender echo");
        assert_eq!(gate.metrics().snapshot().recursive, 1);

        // the marker is released, so the next top-level call goes through again
        let outcome = gate.deliver(&LogEvent::new(Level::Info, "app", "again"));
        assert_eq!(outcome.unwrap(), Delivery::Appended);
        assert_eq!(appender.handler.reports().len(), 2);
    }

    #[test]
    fn test_failure_wrapping_and_swallowing() {
        let strict = Arc::new(BrokenAppender {
            name: "strict".into(),
            ignore: false,
            handler: CollectingHandler::default(),
        });
        let lenient = Arc::new(BrokenAppender {
            name: "lenient".into(),
            ignore: true,
            handler: CollectingHandler::default(),
        });
        let event = LogEvent::new(Level::Error, "app", "boom");

        let err = DispatchGate::new(strict.clone(), None, None)
            .deliver(&event)
            .unwrap_err();
        assert_eq!(err.message(), "An exception occurred processing appender strict");
        assert_eq!(err.appender_name(), Some("strict"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk full");

        let outcome = DispatchGate::new(lenient.clone(), None, None).deliver(&event);
        assert_eq!(
            outcome.unwrap(),
            Delivery::Suppressed(Suppression::AppendFailed)
        );

        for handler in [&strict.handler, &lenient.handler] {
            let reports = handler.reports();
            assert_eq!(reports.len(), 1);
            assert_eq!(reports[0].1.as_deref(), Some("disk full"));
        }
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Level, LogEvent};
    use dispatcher::create_dispatcher;
    use observability::DeliveryAggregator;

    const CONFIG: &str = r#"
[[appenders]]
name = "mem"
kind = "memory"

[[gates]]
appender = "mem"
level = "INFO"
"#;

    #[test]
    fn test_threads_deliver_concurrently() {
        let blueprint = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let dispatcher = create_dispatcher(blueprint).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let dispatcher = &dispatcher;
                scope.spawn(move || {
                    for seq in 0..50 {
                        let level = if seq % 2 == 0 { Level::Info } else { Level::Debug };
                        let summary = dispatcher
                            .dispatch(&LogEvent::new(level, "app", format!("{worker}-{seq}")));
                        assert!(summary.is_ok());
                    }
                });
            }
        });

        let snapshot = dispatcher.gates()[0].metrics().snapshot();
        assert_eq!(snapshot.appended, 200);
        assert_eq!(snapshot.suppressed, 200);
        assert_eq!(snapshot.recursive, 0);
        assert_eq!(dispatcher.memory_appender("mem").unwrap().len(), 200);
    }

    #[tokio::test]
    async fn test_blocking_workers_share_dispatcher() {
        let blueprint = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let dispatcher = Arc::new(create_dispatcher(blueprint).unwrap());

        let mut handles = Vec::new();
        for worker in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(tokio::task::spawn_blocking(move || {
                let mut stats = DeliveryAggregator::new();
                for seq in 0..25 {
                    let summary = dispatcher
                        .dispatch(&LogEvent::new(Level::Warn, "app", format!("{worker}-{seq}")));
                    stats.update(
                        summary.appended as u64,
                        summary.suppressed as u64,
                        summary.failures.len() as u64,
                        1.0,
                    );
                }
                stats
            }));
        }

        let mut total = DeliveryAggregator::new();
        for handle in handles {
            total.merge(&handle.await.unwrap());
        }
        assert_eq!(total.total_events, 100);
        assert_eq!(total.appended, 100);
        assert_eq!(total.summary().failure_rate, 0.0);
    }
}
