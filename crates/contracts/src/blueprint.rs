//! DeliveryBlueprint - Config Loader output
//!
//! Describes the appenders to create and the gates routing events to them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{FilterResult, Level};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Appender definitions
    pub appenders: Vec<AppenderConfig>,

    /// Gates, one per appender reference
    #[serde(default)]
    pub gates: Vec<GateConfig>,
}

impl DeliveryBlueprint {
    /// Look up an appender definition by name
    pub fn appender(&self, name: &str) -> Option<&AppenderConfig> {
        self.appenders.iter().find(|a| a.name == name)
    }
}

/// Appender definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppenderConfig {
    /// Unique appender name
    pub name: String,

    /// Appender type
    pub kind: AppenderKind,

    /// Swallow delivery failures after reporting them
    #[serde(default = "default_ignore_exceptions")]
    pub ignore_exceptions: bool,

    /// The appender's own filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_ignore_exceptions() -> bool {
    true
}

/// Appender type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppenderKind {
    /// Forward events into `tracing`
    Tracing,
    /// JSON lines file
    File,
    /// In-memory capture
    Memory,
}

/// Gate definition: routes events to one appender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Name of the target appender
    pub appender: String,

    /// Minimum severity (absent = accept all levels)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    /// Gate filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,
}

/// Filter definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Match events at least as severe as `level`
    Threshold {
        level: Level,
        #[serde(default = "default_on_match")]
        on_match: FilterResult,
        #[serde(default = "default_on_mismatch")]
        on_mismatch: FilterResult,
    },
    /// Match events whose logger name starts with `prefix`
    LoggerName {
        prefix: String,
        #[serde(default = "default_on_match")]
        on_match: FilterResult,
        #[serde(default = "default_on_mismatch")]
        on_mismatch: FilterResult,
    },
    /// Evaluate nested filters in order
    Composite { filters: Vec<FilterConfig> },
}

fn default_on_match() -> FilterResult {
    FilterResult::Neutral
}

fn default_on_mismatch() -> FilterResult {
    FilterResult::Deny
}
