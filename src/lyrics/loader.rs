//! Background lyric loading: local cache first, then the remote provider.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::library::Track;

use super::cache::{load_cached, save_cached};
use super::model::{Lyrics, LyricsQuery};
use super::parse::parse;
use super::remote::LyricsProvider;

/// Loads lyrics for one track at a time on a worker thread.
#[derive(Clone)]
pub struct LyricsFetcher {
    cache_dir: PathBuf,
    provider: Option<Arc<dyn LyricsProvider>>,
}

impl LyricsFetcher {
    /// `provider` of `None` means cache-only.
    pub fn new(cache_dir: PathBuf, provider: Option<Arc<dyn LyricsProvider>>) -> Self {
        Self {
            cache_dir,
            provider,
        }
    }

    /// Resolve lyrics for `track`, blocking.
    ///
    /// Never fails: anything that goes wrong yields [`Lyrics::empty`].
    pub fn load(&self, track: &Track) -> Lyrics {
        if let Some(lyrics) = load_cached(&track.path, &self.cache_dir) {
            return lyrics;
        }

        let Some(provider) = self.provider.as_ref() else {
            debug!(path = %track.path.display(), "no cached lyrics and remote lookup disabled");
            return Lyrics::empty();
        };

        let query = LyricsQuery {
            artist: track.artist.clone(),
            title: track.title.clone(),
            album: track.album.clone(),
        };
        let content = match provider.fetch(&query) {
            Ok(c) => c,
            Err(e) => {
                info!(title = %track.title, error = %e, "no lyrics found");
                return Lyrics::empty();
            }
        };

        match save_cached(&track.path, &self.cache_dir, &content) {
            Ok(path) => debug!(path = %path.display(), "lyrics cached"),
            Err(e) => warn!(error = %e, "failed to cache lyrics"),
        }

        Lyrics::from_lines(parse(&content))
    }

    /// Resolve lyrics for `track` on a new thread and hand the result to
    /// `deliver` together with the path it was requested for.
    pub fn spawn<F>(&self, track: &Track, deliver: F) -> io::Result<()>
    where
        F: FnOnce(PathBuf, Lyrics) + Send + 'static,
    {
        let fetcher = self.clone();
        let track = track.clone();
        thread::Builder::new()
            .name("lyrics".to_string())
            .spawn(move || {
                let lyrics = fetcher.load(&track);
                deliver(track.path, lyrics);
            })?;
        Ok(())
    }
}
