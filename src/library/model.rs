use std::path::PathBuf;

use thiserror::Error;

/// One playable file and the metadata shown for it.
///
/// Built once by the scanner and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in seconds; `0.0` when the container does not say.
    pub duration: f64,
    pub bitrate: String,
    pub codec: String,
    pub sample_rate: String,
    /// `Artist - Title`, used for listing, sorting and filtering.
    pub display: String,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read metadata from {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },
}
