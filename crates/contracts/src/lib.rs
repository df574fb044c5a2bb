//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace:
//! events, levels, the appender and filter traits, configuration data and errors.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Level Model
//! - Lower integer level = more severe (`OFF` = 0, `ALL` = `i32::MAX`)
//! - A gate threshold rejects events whose integer level is greater than its own

mod appender;
mod blueprint;
mod error;
mod event;
mod filter;
mod level;

pub use appender::{Appender, ErrorHandler};
pub use blueprint::*;
pub use error::*;
pub use event::LogEvent;
pub use filter::{Filter, FilterResult, Filterable};
pub use level::Level;
