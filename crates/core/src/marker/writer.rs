//! Marker file writer.

use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::config::{PolicyFlags, ShortcutOs};
use crate::playlist::RESERVED_NAME_CHARS;

use super::error::MarkerError;

/// What a marker file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// The offending output line as plain text.
    RawText,
    /// A shortcut to the recovery search, in one platform's format.
    Shortcut(ShortcutOs),
}

impl MarkerStyle {
    fn extension(&self) -> &'static str {
        match self {
            Self::RawText => "txt",
            Self::Shortcut(ShortcutOs::Windows) => "url",
            Self::Shortcut(ShortcutOs::Unix) => "desktop",
        }
    }
}

/// Result of a marker write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// A new marker was created.
    Written(PathBuf),
    /// A marker for this item already exists and was left untouched.
    AlreadyPresent(PathBuf),
    /// Marking is turned off.
    Disabled,
}

/// Writes markers for unavailable items.
#[derive(Debug, Clone)]
pub struct MarkerWriter {
    enabled: bool,
    style: MarkerStyle,
    url_template: String,
}

impl MarkerWriter {
    pub fn new(enabled: bool, style: MarkerStyle, url_template: impl Into<String>) -> Self {
        Self {
            enabled,
            style,
            url_template: url_template.into(),
        }
    }

    pub fn from_policy(policy: &PolicyFlags) -> Self {
        let style = if policy.recovery_shortcuts {
            MarkerStyle::Shortcut(policy.shortcut_os)
        } else {
            MarkerStyle::RawText
        };
        Self::new(
            policy.mark_unavailable,
            style,
            policy.recovery_url_template.clone(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    /// `"004 - abc123 - unavailable.url"` for item 4.
    pub fn file_name(&self, index: u32, item_id: &str) -> String {
        format!(
            "{:03} - {} - unavailable.{}",
            index,
            sanitize(item_id),
            self.style.extension()
        )
    }

    pub fn recovery_url(&self, item_id: &str) -> String {
        self.url_template
            .replace("{id}", &urlencoding::encode(item_id))
    }

    /// Creates the marker for item `index`/`item_id` inside `directory`.
    ///
    /// Existing markers are never overwritten.
    pub async fn write(
        &self,
        directory: &Path,
        index: u32,
        item_id: &str,
        raw_line: &str,
    ) -> Result<MarkerOutcome, MarkerError> {
        if !self.enabled {
            return Ok(MarkerOutcome::Disabled);
        }

        let path = directory.join(self.file_name(index, item_id));
        let contents = self.contents(index, item_id, raw_line);

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Ok(MarkerOutcome::AlreadyPresent(path));
            }
            Err(e) => return Err(MarkerError::WriteFailed { path, source: e }),
        };

        if let Err(e) = write_all(&mut file, contents.as_bytes()).await {
            drop(file);
            return Err(discard(MarkerError::WriteFailed { path, source: e }).await);
        }
        drop(file);

        if self.style == MarkerStyle::Shortcut(ShortcutOs::Unix) {
            if let Err(e) = make_executable(&path).await {
                return Err(discard(e).await);
            }
        }

        Ok(MarkerOutcome::Written(path))
    }

    fn contents(&self, index: u32, item_id: &str, raw_line: &str) -> String {
        match self.style {
            MarkerStyle::RawText => format!("{}\n", raw_line),
            MarkerStyle::Shortcut(ShortcutOs::Windows) => format!(
                "[InternetShortcut]\r\nURL={}\r\n",
                self.recovery_url(item_id)
            ),
            MarkerStyle::Shortcut(ShortcutOs::Unix) => format!(
                "[Desktop Entry]\nEncoding=UTF-8\nName={:03} - {} (unavailable)\nType=Link\nURL={}\nIcon=text-html\n",
                index,
                item_id,
                self.recovery_url(item_id)
            ),
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Removes a marker that could not be completed so the next run retries it.
async fn discard(error: MarkerError) -> MarkerError {
    let path = match &error {
        MarkerError::WriteFailed { path, .. }
        | MarkerError::PermissionsFailed { path, .. } => path,
    };
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove incomplete marker '{}': {}", path.display(), e);
    }
    error
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), MarkerError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| MarkerError::PermissionsFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), MarkerError> {
    Ok(())
}

fn sanitize(item_id: &str) -> String {
    item_id
        .chars()
        .map(|c| if RESERVED_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
