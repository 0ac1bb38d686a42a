//! Playlist registry types.
//!
//! A playlist is identified by a [`PlaylistDescriptor`] (name, kind, url). Each
//! descriptor maps to a [`DestinationContext`] under the configured destination
//! root, which holds the downloaded media and the downloader's archive ledger.

mod error;
mod types;

pub use error::PlaylistError;
pub use types::{
    is_valid_dirname, DestinationContext, PlaylistDescriptor, PlaylistKind, ARCHIVE_FILE_NAME,
    RESERVED_NAME_CHARS,
};
