//! Invocation builder for the external downloader.
//!
//! Turns a playlist descriptor, its destination and the global policy flags into
//! the exact argument vector handed to yt-dlp. Building is pure: nothing is
//! created, checked or spawned here.
//!
//! Every invocation, regardless of kind, asks the downloader to:
//! - write into the playlist directory
//! - keep going when a single item fails
//! - skip items already recorded in the archive ledger
//! - use a length-bounded output filename
//! - leave file modification times at fetch time

mod builder;
mod error;

pub use builder::{Invocation, InvocationBuilder};
pub use error::InvocationError;
