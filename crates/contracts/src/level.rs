//! Severity levels
//!
//! Lower integer level means more severe. `All` is the least restrictive level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Nothing passes a gate configured with this level
    Off,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    /// Everything passes a gate configured with this level
    All,
}

impl Level {
    /// Every standard level, most severe first
    pub const VALUES: [Level; 8] = [
        Level::Off,
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
        Level::All,
    ];

    /// Numeric level used for threshold comparisons
    pub const fn int_level(self) -> i32 {
        match self {
            Level::Off => 0,
            Level::Fatal => 100,
            Level::Error => 200,
            Level::Warn => 300,
            Level::Info => 400,
            Level::Debug => 500,
            Level::Trace => 600,
            Level::All => i32::MAX,
        }
    }

    /// Upper-case level name
    pub const fn name(self) -> &'static str {
        match self {
            Level::Off => "OFF",
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
            Level::All => "ALL",
        }
    }

    /// True if `self` is at least as severe as `other`
    pub const fn is_more_specific_than(self, other: Level) -> bool {
        self.int_level() <= other.int_level()
    }

    /// True if `self` is at most as severe as `other`
    pub const fn is_less_specific_than(self, other: Level) -> bool {
        self.int_level() >= other.int_level()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Level::VALUES
            .into_iter()
            .find(|level| level.name() == upper)
            .ok_or_else(|| ContractError::unknown_level(s))
    }
}
