//! Load generation module.

mod orchestrator;
mod stats;

pub use orchestrator::{LoadConfig, LoadRunner};
pub use stats::RunStats;
