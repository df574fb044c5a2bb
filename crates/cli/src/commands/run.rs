//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::DeliveryBlueprint;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{LoadConfig, LoadRunner};

/// Execute the `run` command
pub async fn run_load(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        appenders = blueprint.appenders.len(),
        gates = blueprint.gates.len(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let load_config = LoadConfig {
        blueprint,
        events_per_worker: args.events,
        workers: args.threads,
        level: args.level,
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let runner = LoadRunner::new(load_config);
    let shutdown = runner.shutdown_flag();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, stopping workers...");
        shutdown.store(true, Ordering::Relaxed);
    });

    info!("Starting delivery...");
    let stats = runner.run().await.context("Load run failed")?;

    info!(
        events = stats.delivery.total_events,
        duration_secs = stats.duration.as_secs_f64(),
        eps = format!("{:.2}", stats.eps()),
        "Run completed"
    );
    stats.print_summary();

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &DeliveryBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Appenders ({}):", blueprint.appenders.len());
    for appender in &blueprint.appenders {
        println!(
            "  - {} ({:?}, ignore_exceptions={})",
            appender.name, appender.kind, appender.ignore_exceptions
        );
    }

    println!("\nGates ({}):", blueprint.gates.len());
    for gate in &blueprint.gates {
        match gate.level {
            Some(level) => println!("  - {} (level {})", gate.appender, level),
            None => println!("  - {} (all levels)", gate.appender),
        }
    }

    println!();
}
