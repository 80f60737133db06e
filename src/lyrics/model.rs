use std::io;

use thiserror::Error;

/// One timestamped lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track.
    pub time: f64,
    pub text: String,
}

/// The lyric set attached to a track.
///
/// `loaded` with no lines means "looked everywhere, found nothing"; the UI
/// shows that as "no lyrics" instead of retrying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lyrics {
    pub lines: Vec<LyricLine>,
    pub loaded: bool,
}

impl Lyrics {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            loaded: true,
        }
    }

    pub fn from_lines(lines: Vec<LyricLine>) -> Self {
        Self {
            lines,
            loaded: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What to look up remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub artist: String,
    pub title: String,
    pub album: String,
}

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("lyrics i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("lyrics request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lyrics service returned status {0}")]
    Status(u16),

    #[error("no synced lyrics found")]
    NotFound,
}
