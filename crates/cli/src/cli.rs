//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Level;
use std::path::PathBuf;

/// Gate CLI - drive log events through configured appender gates
#[derive(Parser, Debug)]
#[command(
    name = "gate-cli",
    author,
    version,
    about = "Appender dispatch gate driver",
    long_about = "Loads a delivery configuration, builds one gate per appender reference \n\
                  and delivers synthetic log events through them.\n\n\
                  Failures are reported through each appender's error handler and \n\
                  either swallowed or propagated according to its configuration."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "GATE_CLI_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "GATE_CLI_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deliver synthetic events through the configured gates
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "delivery.toml", env = "GATE_CLI_CONFIG")]
    pub config: PathBuf,

    /// Number of events each worker delivers
    #[arg(long, default_value = "1000", env = "GATE_CLI_EVENTS")]
    pub events: u64,

    /// Number of blocking worker threads
    #[arg(long, default_value = "4", env = "GATE_CLI_THREADS")]
    pub threads: usize,

    /// Level of every synthetic event (cycles FATAL..TRACE when omitted)
    #[arg(long)]
    pub level: Option<Level>,

    /// Run timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "GATE_CLI_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without delivering events
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "GATE_CLI_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "delivery.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "delivery.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show filter definitions
    #[arg(long)]
    pub filters: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
