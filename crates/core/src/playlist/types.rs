//! Playlist descriptor and destination types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::PlaylistError;

/// Characters that may not appear in a playlist name.
pub const RESERVED_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// File name of the downloader's archive ledger inside each playlist directory.
pub const ARCHIVE_FILE_NAME: &str = "downloaded.txt";

/// Returns true if `name` can be used verbatim as a directory name.
pub fn is_valid_dirname(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(RESERVED_NAME_CHARS)
}

/// What to fetch for each playlist item.
///
/// Unrecognised values are kept as [`PlaylistKind::Unknown`] so the error can be
/// reported with the offending value instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaylistKind {
    /// Best combined video and audio, merged into one container.
    Video,
    /// Best audio only, extracted and tagged.
    Audio,
    /// Anything else found in the registry.
    Unknown(String),
}

impl PlaylistKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Unknown(kind) => kind,
        }
    }
}

impl From<String> for PlaylistKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "video" => Self::Video,
            "audio" => Self::Audio,
            _ => Self::Unknown(value),
        }
    }
}

impl From<&str> for PlaylistKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PlaylistKind> for String {
    fn from(kind: PlaylistKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remote playlist to mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDescriptor {
    /// Display name, also used as the directory name.
    pub name: String,
    /// Whether to fetch video or audio.
    pub kind: PlaylistKind,
    /// URL of the playlist itself (not of an item in it).
    pub url: String,
}

impl PlaylistDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<PlaylistKind>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            url: url.into(),
        }
    }

    /// Checks that the name is usable as a directory and the kind is known.
    pub fn preflight(&self) -> Result<(), PlaylistError> {
        if !is_valid_dirname(&self.name) {
            return Err(PlaylistError::InvalidName {
                name: self.name.clone(),
                reserved: RESERVED_NAME_CHARS.iter().collect(),
            });
        }

        if let PlaylistKind::Unknown(kind) = &self.kind {
            return Err(PlaylistError::UnknownKind {
                name: self.name.clone(),
                kind: kind.clone(),
            });
        }

        Ok(())
    }
}

/// Where a playlist's files and archive ledger live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationContext {
    /// `root/name`.
    pub directory: PathBuf,
    /// `root/name/downloaded.txt`. Only ever handed to the downloader.
    pub archive_path: PathBuf,
}

impl DestinationContext {
    pub fn new(root: &Path, playlist_name: &str) -> Self {
        let directory = root.join(playlist_name);
        let archive_path = directory.join(ARCHIVE_FILE_NAME);
        Self {
            directory,
            archive_path,
        }
    }

    /// True only when `directory` is an actual directory.
    pub async fn directory_exists(&self) -> bool {
        tokio::fs::metadata(&self.directory)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Creates the playlist directory, including missing parents.
    ///
    /// Fails if something other than a directory already occupies the path.
    pub async fn create_directory(&self) -> std::io::Result<()> {
        if let Ok(metadata) = tokio::fs::metadata(&self.directory).await {
            if !metadata.is_dir() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ));
            }
        }
        tokio::fs::create_dir_all(&self.directory).await
    }
}
