mod cli;
mod logging;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use tubemirror_core::{
    load_config, validate_config, CommandRunner, Config, Invocation, Orchestrator,
    PlaylistDescriptor, PlaylistOutcome, RunSummary,
};

use cli::Cli;

/// One entry of the `--dry-run` output.
#[derive(Debug, Serialize)]
struct PlannedRun<'a> {
    playlist: &'a str,
    invocation: Invocation,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("[Fatal] {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_file = logging::init_logging();

    // Load configuration
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    let log_path = config.destination.log_file();
    if let Err(e) = log_file.attach(&log_path) {
        warn!("Could not open log file {:?}: {}", log_path, e);
    }

    info!(
        "=== {} ===",
        chrono::Local::now().format("%-m/%-d/%Y %-I:%M %p")
    );
    info!("Initializing");

    validate_config(&config).context("Configuration validation failed")?;
    check_environment(&config)?;
    info!("Initialization success!");

    let playlists = select_playlists(&config.playlists, &cli.only)?;

    let runner = CommandRunner::new()
        .with_timeout(config.downloader.timeout_secs.map(Duration::from_secs));
    let orchestrator = Orchestrator::new(&config, runner);

    if cli.dry_run {
        let mut plans = Vec::with_capacity(playlists.len());
        for playlist in &playlists {
            plans.push(PlannedRun {
                playlist: &playlist.name,
                invocation: orchestrator.plan(playlist)?,
            });
        }
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    let summary = orchestrator.run(&playlists).await?;
    log_summary(&summary);
    info!("Finished.");

    Ok(())
}

/// Checks the conditions without which no playlist can be synced.
fn check_environment(config: &Config) -> Result<()> {
    let binary = &config.downloader.binary;
    if has_separator(binary) && !binary.exists() {
        bail!("Downloader not found at {:?}", binary);
    }

    let root = &config.destination.root;
    if !root.is_dir() {
        bail!("Destination root {:?} does not exist", root);
    }

    Ok(())
}

/// Bare program names are resolved through `PATH` at spawn time.
fn has_separator(binary: &Path) -> bool {
    binary.components().count() > 1
}

/// Narrows the registry to the playlists named on the command line, keeping
/// registry order. An empty filter selects everything.
fn select_playlists(
    registry: &[PlaylistDescriptor],
    only: &[String],
) -> Result<Vec<PlaylistDescriptor>> {
    if only.is_empty() {
        return Ok(registry.to_vec());
    }

    if let Some(unknown) = only
        .iter()
        .find(|name| !registry.iter().any(|p| &p.name == *name))
    {
        bail!("No playlist named {:?} in the configuration", unknown);
    }

    Ok(registry
        .iter()
        .filter(|p| only.contains(&p.name))
        .cloned()
        .collect())
}

fn log_summary(summary: &RunSummary) {
    for report in &summary.playlists {
        match &report.outcome {
            PlaylistOutcome::Completed { exit_code } => info!(
                "{}: {} of {} items completed, {} skipped, {} unavailable (exit {:?})",
                report.name,
                report.completed,
                report.total_items,
                report.skipped,
                report.unavailable,
                exit_code
            ),
            PlaylistOutcome::TimedOut { timeout_secs } => warn!(
                "{}: killed after {} seconds ({} of {} items completed)",
                report.name, timeout_secs, report.completed, report.total_items
            ),
            PlaylistOutcome::Failed { reason } => {
                warn!("{}: not synced: {}", report.name, reason)
            }
        }
    }

    info!(
        "{} of {} playlists synced cleanly, {} failed, {} new unavailable markers",
        summary.clean_count(),
        summary.playlists.len(),
        summary.failed_count(),
        summary.markers_written()
    );
}
