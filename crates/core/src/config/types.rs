use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classifier::OutputPatterns;
use crate::playlist::PlaylistDescriptor;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub downloader: DownloaderConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub policy: PolicyFlags,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub output_patterns: OutputPatterns,
    /// Playlist registry, synced in order.
    #[serde(default)]
    pub playlists: Vec<PlaylistDescriptor>,
}

impl Config {
    /// Creates a config with defaults for everything but the destination root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            downloader: DownloaderConfig::default(),
            destination: DestinationConfig {
                root: root.into(),
                log_file: None,
            },
            policy: PolicyFlags::default(),
            rate_limit: RateLimitConfig::default(),
            output_patterns: OutputPatterns::default(),
            playlists: Vec::new(),
        }
    }
}

/// External downloader configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloaderConfig {
    /// Path to the yt-dlp binary. Absolute paths keep cron runs predictable.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Cookies file handed to the downloader when `policy.use_cookies` is set.
    #[serde(default = "default_cookies_file")]
    pub cookies_file: PathBuf,
    /// Kill a playlist run that takes longer than this (default: no limit).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Output filename template; the title is capped to keep names short.
    #[serde(default = "default_output_template")]
    pub output_template: String,
    /// Container used when merging video and audio streams.
    #[serde(default = "default_video_merge_format")]
    pub video_merge_format: String,
    /// Container audio playlists are extracted to.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            cookies_file: default_cookies_file(),
            timeout_secs: None,
            output_template: default_output_template(),
            video_merge_format: default_video_merge_format(),
            audio_format: default_audio_format(),
        }
    }
}

fn default_binary() -> PathBuf {
    PathBuf::from("/usr/local/bin/yt-dlp")
}

fn default_cookies_file() -> PathBuf {
    PathBuf::from("cookies.txt")
}

fn default_output_template() -> String {
    "%(playlist_index)03d - %(title).100s.%(ext)s".to_string()
}

fn default_video_merge_format() -> String {
    "mkv".to_string()
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

/// Destination configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Directory that holds one subdirectory per playlist.
    pub root: PathBuf,
    /// Append-mode log file (default: `<root>/playlist-maintainer.log`).
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl DestinationConfig {
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.root.join("playlist-maintainer.log"))
    }
}

/// Switches that shape every invocation and the reaction to unavailable items.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyFlags {
    /// Pass the cookies file to the downloader.
    #[serde(default)]
    pub use_cookies: bool,
    /// Add request/item delays and a bandwidth cap to every invocation.
    #[serde(default)]
    pub rate_limit: bool,
    /// Leave a marker file behind for every unavailable item.
    #[serde(default = "default_true")]
    pub mark_unavailable: bool,
    /// Write markers as clickable shortcuts instead of raw text dumps.
    #[serde(default = "default_true")]
    pub recovery_shortcuts: bool,
    /// Shortcut flavour, chosen once for the whole run.
    #[serde(default)]
    pub shortcut_os: ShortcutOs,
    /// Recovery search URL; `{id}` is replaced with the item identifier.
    #[serde(default = "default_recovery_url_template")]
    pub recovery_url_template: String,
}

impl Default for PolicyFlags {
    fn default() -> Self {
        Self {
            use_cookies: false,
            rate_limit: false,
            mark_unavailable: true,
            recovery_shortcuts: true,
            shortcut_os: ShortcutOs::default(),
            recovery_url_template: default_recovery_url_template(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_recovery_url_template() -> String {
    "https://filmot.com/search/{id}/1".to_string()
}

/// Target platform for recovery shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutOs {
    /// `.url` internet shortcut.
    Windows,
    /// `.desktop` link entry, marked executable.
    Unix,
}

impl Default for ShortcutOs {
    fn default() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Anti-throttling settings, applied when `policy.rate_limit` is set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Fixed delay between metadata/API requests.
    #[serde(default = "default_sleep_requests")]
    pub sleep_requests_secs: f64,
    /// Lower bound of the random delay between item downloads.
    #[serde(default = "default_min_sleep_interval")]
    pub min_sleep_interval_secs: u64,
    /// Upper bound of the random delay between item downloads.
    #[serde(default = "default_max_sleep_interval")]
    pub max_sleep_interval_secs: u64,
    /// Download bandwidth ceiling in the downloader's notation (e.g. `5M`).
    #[serde(default = "default_limit_rate")]
    pub limit_rate: String,
    /// Backoff after a failed fragment fetch.
    #[serde(default = "default_fragment_retry_sleep")]
    pub fragment_retry_sleep_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            sleep_requests_secs: default_sleep_requests(),
            min_sleep_interval_secs: default_min_sleep_interval(),
            max_sleep_interval_secs: default_max_sleep_interval(),
            limit_rate: default_limit_rate(),
            fragment_retry_sleep_secs: default_fragment_retry_sleep(),
        }
    }
}

fn default_sleep_requests() -> f64 {
    1.5
}

fn default_min_sleep_interval() -> u64 {
    60
}

fn default_max_sleep_interval() -> u64 {
    90
}

fn default_limit_rate() -> String {
    "5M".to_string()
}

fn default_fragment_retry_sleep() -> u64 {
    300
}
