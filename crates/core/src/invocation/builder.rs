//! Argument construction for yt-dlp.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{Config, DownloaderConfig, PolicyFlags, RateLimitConfig};
use crate::playlist::{DestinationContext, PlaylistDescriptor, PlaylistKind};

use super::error::InvocationError;

/// A fully built downloader command line. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns true if `flag` appears anywhere in the argument list.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// Returns the value following `flag`, if any.
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Builds downloader invocations from the global policy.
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    downloader: DownloaderConfig,
    policy: PolicyFlags,
    rate_limit: RateLimitConfig,
}

impl InvocationBuilder {
    pub fn new(
        downloader: DownloaderConfig,
        policy: PolicyFlags,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            downloader,
            policy,
            rate_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.downloader.clone(),
            config.policy.clone(),
            config.rate_limit.clone(),
        )
    }

    /// Builds the invocation for one playlist run.
    pub fn build(
        &self,
        playlist: &PlaylistDescriptor,
        destination: &DestinationContext,
    ) -> Result<Invocation, InvocationError> {
        let kind_args = match &playlist.kind {
            PlaylistKind::Video => self.video_args(),
            PlaylistKind::Audio => self.audio_args(),
            PlaylistKind::Unknown(kind) => {
                return Err(InvocationError::UnknownKind {
                    name: playlist.name.clone(),
                    kind: kind.clone(),
                })
            }
        };

        let mut args = self.common_args(destination);
        args.extend(kind_args);

        if self.policy.rate_limit {
            args.extend(self.rate_limit_args());
        }

        if self.policy.use_cookies {
            args.extend([
                "--cookies".to_string(),
                self.downloader.cookies_file.to_string_lossy().to_string(),
            ]);
        }

        // Keeps a URL starting with '-' from being read as an option
        args.push("--".to_string());
        args.push(playlist.url.clone());

        Ok(Invocation::new(self.downloader.binary.clone(), args))
    }

    fn common_args(&self, destination: &DestinationContext) -> Vec<String> {
        vec![
            "--paths".to_string(),
            destination.directory.to_string_lossy().to_string(),
            "--ignore-errors".to_string(),
            "--download-archive".to_string(),
            destination.archive_path.to_string_lossy().to_string(),
            "--output".to_string(),
            self.downloader.output_template.clone(),
            "--no-mtime".to_string(),
            // One progress report per line instead of carriage-return updates
            "--newline".to_string(),
            "--no-colors".to_string(),
        ]
    }

    fn video_args(&self) -> Vec<String> {
        vec![
            "--format".to_string(),
            "bestvideo+bestaudio/best".to_string(),
            "--merge-output-format".to_string(),
            self.downloader.video_merge_format.clone(),
        ]
    }

    fn audio_args(&self) -> Vec<String> {
        vec![
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            self.downloader.audio_format.clone(),
            "--audio-quality".to_string(),
            "0".to_string(),
            "--embed-metadata".to_string(),
            "--embed-thumbnail".to_string(),
        ]
    }

    fn rate_limit_args(&self) -> Vec<String> {
        let limits = &self.rate_limit;
        vec![
            "--sleep-requests".to_string(),
            limits.sleep_requests_secs.to_string(),
            "--sleep-interval".to_string(),
            limits.min_sleep_interval_secs.to_string(),
            "--max-sleep-interval".to_string(),
            limits.max_sleep_interval_secs.to_string(),
            "--limit-rate".to_string(),
            limits.limit_rate.clone(),
            "--retry-sleep".to_string(),
            format!("fragment:{}", limits.fragment_retry_sleep_secs),
        ]
    }
}
