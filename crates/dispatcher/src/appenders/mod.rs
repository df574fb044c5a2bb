//! Appender implementations
//!
//! Contains TracingAppender, FileAppender, and MemoryAppender, plus the
//! [`AppenderCore`] state they share.

#[macro_use]
mod macros;

mod base;
mod file;
mod memory;
mod trace;

pub use self::base::AppenderCore;
pub use self::file::{FileAppender, FileAppenderConfig};
pub use self::memory::MemoryAppender;
pub use self::trace::TracingAppender;
