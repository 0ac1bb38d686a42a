//! Placeholder artifacts for unavailable playlist items.
//!
//! When the downloader reports an item as unavailable, a marker file is left in
//! the playlist directory in its place: either a raw dump of the error line or
//! a clickable shortcut to a recovery search for the item.

mod error;
mod writer;

pub use error::MarkerError;
pub use writer::{MarkerOutcome, MarkerStyle, MarkerWriter};
