//! Orchestrator implementation.
//!
//! One playlist at a time, one child process at a time. Each run gets a fresh
//! classifier (and so a fresh `RunState`); output is classified line by line
//! until the child's streams close, and only then is its exit status read.

use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

use crate::classifier::{OutputPatterns, RunState, StreamClassifier, StreamEvent};
use crate::config::Config;
use crate::invocation::{Invocation, InvocationBuilder};
use crate::marker::{MarkerOutcome, MarkerWriter};
use crate::playlist::{DestinationContext, PlaylistDescriptor};
use crate::runner::{ProcessRunner, RunnerError};

use super::types::{PlaylistOutcome, PlaylistReport, RunSummary, SyncError};

/// Syncs playlists by running the downloader against each in turn.
pub struct Orchestrator<R>
where
    R: ProcessRunner,
{
    root: PathBuf,
    builder: InvocationBuilder,
    markers: MarkerWriter,
    patterns: OutputPatterns,
    runner: R,
}

impl<R> Orchestrator<R>
where
    R: ProcessRunner,
{
    pub fn new(config: &Config, runner: R) -> Self {
        Self {
            root: config.destination.root.clone(),
            builder: InvocationBuilder::from_config(config),
            markers: MarkerWriter::from_policy(&config.policy),
            patterns: config.output_patterns.clone(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Syncs every playlist in order.
    ///
    /// Stops at the first configuration error; every other failure is recorded
    /// in that playlist's report and the run moves on.
    pub async fn run(&self, playlists: &[PlaylistDescriptor]) -> Result<RunSummary, SyncError> {
        info!("Initiating scan for {} playlists.", playlists.len());

        let mut summary = RunSummary::default();
        for (position, playlist) in playlists.iter().enumerate() {
            let report = self.run_playlist(position, playlist).await?;
            summary.playlists.push(report);
        }

        Ok(summary)
    }

    /// Builds the invocation for `playlist` without touching the filesystem.
    pub fn plan(&self, playlist: &PlaylistDescriptor) -> Result<Invocation, SyncError> {
        playlist.preflight()?;
        let destination = DestinationContext::new(&self.root, &playlist.name);
        Ok(self.builder.build(playlist, &destination)?)
    }

    /// Syncs a single playlist. `position` is only used for log labels.
    pub async fn run_playlist(
        &self,
        position: usize,
        playlist: &PlaylistDescriptor,
    ) -> Result<PlaylistReport, SyncError> {
        playlist.preflight()?;

        let name = playlist.name.as_str();
        let destination = DestinationContext::new(&self.root, name);
        let mut report = PlaylistReport::new(name);

        if !destination.directory_exists().await {
            warn!("Directory for '{}' does not exist.", name);
            if let Err(e) = destination.create_directory().await {
                error!(
                    "Failed to create '{}': {}. Skipping playlist.",
                    destination.directory.display(),
                    e
                );
                return Ok(report.failed(format!("failed to create directory: {}", e)));
            }
            info!("Created '{}'", destination.directory.display());
            report.directory_created = true;
        }

        let invocation = self.builder.build(playlist, &destination)?;

        info!("Scanning playlist {} \"{}\"", position, name);
        debug!(
            "Running {} {}",
            invocation.program().display(),
            invocation.args().join(" ")
        );

        let mut run = match self.runner.start(&invocation).await {
            Ok(run) => run,
            Err(e) => {
                error!("Failed to start downloader for \"{}\": {}", name, e);
                return Ok(report.failed(e.to_string()));
            }
        };

        let mut classifier = StreamClassifier::new(self.patterns.clone());
        while let Some(line) = run.next_line().await {
            let event = classifier.classify(&line);
            self.handle_event(name, &destination, classifier.state(), event, &mut report)
                .await;
        }

        report.total_items = classifier.state().total_items;
        report.outcome = match run.wait().await {
            Ok(exit) => {
                if !exit.success() {
                    warn!(
                        "Downloader exited with status {:?} for \"{}\"",
                        exit.code, name
                    );
                }
                PlaylistOutcome::Completed {
                    exit_code: exit.code,
                }
            }
            Err(RunnerError::Timeout { timeout_secs }) => {
                warn!(
                    "Downloader for \"{}\" killed after {} seconds",
                    name, timeout_secs
                );
                PlaylistOutcome::TimedOut { timeout_secs }
            }
            Err(e) => {
                warn!("Downloader for \"{}\" did not report a status: {}", name, e);
                PlaylistOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        info!("Scanning playlist {} \"{}\" complete.", position, name);
        Ok(report)
    }

    async fn handle_event(
        &self,
        name: &str,
        destination: &DestinationContext,
        state: RunState,
        event: StreamEvent,
        report: &mut PlaylistReport,
    ) {
        match event {
            StreamEvent::Progress {
                complete: false,
                index,
                total,
            } => {
                info!("[{}] Downloading item {} of {}", name, index, total);
                report.announced += 1;
            }
            StreamEvent::Progress {
                complete: true,
                index,
                total,
            } => {
                debug!("[{}] Item {} of {} downloaded", name, index, total);
                report.record_completion(index);
            }
            StreamEvent::Skipped { item_id } => {
                info!("[{}] {} already downloaded, skipping", name, item_id);
                report.skipped += 1;
            }
            StreamEvent::Unavailable { item_id, raw_line } => {
                warn!(
                    "[{}] Item {} ({}) is unavailable",
                    name, state.current_item_index, item_id
                );
                report.unavailable += 1;
                self.mark_unavailable(destination, state, &item_id, &raw_line, report)
                    .await;
            }
            StreamEvent::Passthrough { raw_line } => {
                trace!("[{}] {}", name, raw_line);
            }
        }
    }

    async fn mark_unavailable(
        &self,
        destination: &DestinationContext,
        state: RunState,
        item_id: &str,
        raw_line: &str,
        report: &mut PlaylistReport,
    ) {
        let result = self
            .markers
            .write(
                &destination.directory,
                state.current_item_index,
                item_id,
                raw_line,
            )
            .await;

        match result {
            Ok(MarkerOutcome::Written(path)) => {
                debug!("Created marker '{}'", path.display());
                report.markers_written += 1;
            }
            Ok(MarkerOutcome::AlreadyPresent(path)) => {
                debug!("Marker '{}' already exists", path.display());
            }
            Ok(MarkerOutcome::Disabled) => {}
            Err(e) => {
                warn!("Failed to create marker for {}: {}", item_id, e);
            }
        }
    }
}
