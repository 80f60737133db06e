//! Music library: reading track metadata and scanning a directory tree.

mod metadata;
mod model;
mod scan;

pub use metadata::{UNKNOWN_ALBUM, UNKNOWN_ARTIST, read_track};
pub use model::{LibraryError, Track};
pub use scan::{is_audio_file, scan};

#[cfg(test)]
mod tests;
