//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{DeliveryBlueprint, FilterConfig};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    appenders: Vec<AppenderInfo>,
    gates: Vec<GateInfo>,
}

#[derive(Serialize)]
struct AppenderInfo {
    name: String,
    kind: String,
    ignore_exceptions: bool,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    params: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterConfig>,
}

#[derive(Serialize)]
struct GateInfo {
    appender: String,
    level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterConfig>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &DeliveryBlueprint, args: &InfoArgs) -> ConfigInfo {
    let appenders = blueprint
        .appenders
        .iter()
        .map(|a| AppenderInfo {
            name: a.name.clone(),
            kind: format!("{:?}", a.kind),
            ignore_exceptions: a.ignore_exceptions,
            params: a.params.clone(),
            filter: a.filter.clone().filter(|_| args.filters),
        })
        .collect();

    let gates = blueprint
        .gates
        .iter()
        .map(|g| GateInfo {
            appender: g.appender.clone(),
            level: level_label(g.level),
            filter: g.filter.clone().filter(|_| args.filters),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        appenders,
        gates,
    }
}

fn level_label(level: Option<contracts::Level>) -> String {
    level.map_or_else(|| "(all)".to_string(), |l| l.to_string())
}

/// One-line description of a filter tree
fn describe_filter(filter: &FilterConfig) -> String {
    match filter {
        FilterConfig::Threshold {
            level,
            on_match,
            on_mismatch,
        } => format!("threshold >= {level} ({on_match:?}/{on_mismatch:?})"),
        FilterConfig::LoggerName {
            prefix,
            on_match,
            on_mismatch,
        } => format!("logger '{prefix}*' ({on_match:?}/{on_mismatch:?})"),
        FilterConfig::Composite { filters } => {
            let parts: Vec<String> = filters.iter().map(describe_filter).collect();
            format!("composite [{}]", parts.join(", "))
        }
    }
}

fn print_config_info(blueprint: &DeliveryBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Delivery Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📄 Version: {:?}", blueprint.version);

    println!("\n📤 Appenders ({})", blueprint.appenders.len());
    for (i, appender) in blueprint.appenders.iter().enumerate() {
        let is_last = i == blueprint.appenders.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {} ({:?}, ignore_exceptions={})",
            prefix, appender.name, appender.kind, appender.ignore_exceptions
        );
        if let Some(path) = appender.params.get("path") {
            println!("   {}  └─ path: {}", child_prefix, path);
        }
        if args.filters {
            if let Some(ref filter) = appender.filter {
                println!("   {}  └─ filter: {}", child_prefix, describe_filter(filter));
            }
        }
    }

    println!("\n🚦 Gates ({})", blueprint.gates.len());
    for (i, gate) in blueprint.gates.iter().enumerate() {
        let is_last = i == blueprint.gates.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        println!(
            "   {} {} (level: {})",
            prefix,
            gate.appender,
            level_label(gate.level)
        );
        if args.filters {
            if let Some(ref filter) = gate.filter {
                let child_prefix = if is_last { "   " } else { "│  " };
                println!("   {}  └─ filter: {}", child_prefix, describe_filter(filter));
            }
        }
    }

    println!();
}
