//! Appender macros
//!
//! Use declarative macros to eliminate the `Appender` methods every
//! implementation forwards to its [`AppenderCore`](super::AppenderCore).

/// Generate the `Appender` methods backed by a `core: AppenderCore` field
///
/// # Usage
/// ```ignore
/// impl Appender for MemoryAppender {
///     delegate_appender_core!();
///
///     fn append(&self, event: &LogEvent) -> Result<(), AppendError> { .. }
///     fn start(&self) -> Result<(), AppendError> { .. }
///     fn stop(&self) { .. }
/// }
/// ```
macro_rules! delegate_appender_core {
    () => {
        fn name(&self) -> &str {
            self.core.name()
        }

        fn is_started(&self) -> bool {
            self.core.is_started()
        }

        fn ignore_exceptions(&self) -> bool {
            self.core.ignores_exceptions()
        }

        fn handler(&self) -> &dyn contracts::ErrorHandler {
            self.core.handler()
        }

        fn as_filterable(&self) -> Option<&dyn contracts::Filterable> {
            self.core.as_filterable()
        }
    };
}
