use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::Completion;
use crate::library::Track;
use crate::lyrics::Lyrics;

use super::shuffle::ShuffleSelector;

/// The playback state of the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Everything that can wake the coordinator besides a key press.
///
/// Background work (the position clock, decoder watchers, lyric lookups)
/// never touches the session directly; it only sends one of these.
#[derive(Debug)]
pub enum PlayerEvent {
    Tick(Instant),
    BackendFinished(Completion),
    LyricsLoaded { path: PathBuf, lyrics: Lyrics },
}

/// Mutable playback state, owned by the [`Controller`](super::Controller).
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub state: PlaybackState,
    /// Index into the track list.
    pub current: Option<usize>,
    /// Seconds into the current track, estimated from ticks.
    pub elapsed: f64,
    pub last_tick: Instant,
    /// Seeks are ignored until this instant.
    pub seek_locked_until: Option<Instant>,
    pub shuffle: ShuffleSelector,
}

impl PlaybackSession {
    pub fn new(now: Instant, shuffle: bool) -> Self {
        Self {
            state: PlaybackState::Stopped,
            current: None,
            elapsed: 0.0,
            last_tick: now,
            seek_locked_until: None,
            shuffle: ShuffleSelector::new(shuffle),
        }
    }

    pub fn is_seeking(&self, now: Instant) -> bool {
        self.seek_locked_until.is_some_and(|until| now < until)
    }
}

/// Knobs the controller takes from settings.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub volume: u8,
    pub volume_step: u8,
    pub seek_step: f64,
    pub seek_debounce: Duration,
    pub shuffle: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            volume: 100,
            volume_step: 5,
            seek_step: 5.0,
            seek_debounce: Duration::from_millis(100),
            shuffle: false,
        }
    }
}

/// What the lyric panel should show for the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsView<'a> {
    /// Lyrics are turned off or never requested.
    NotLoaded,
    Loading,
    /// Looked everywhere, found nothing.
    Missing,
    Lines { current: &'a str, next: &'a str },
}

/// Read-only view of the controller for rendering.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: PlaybackState,
    pub index: Option<usize>,
    pub track: Option<&'a Track>,
    pub elapsed: f64,
    pub shuffle: bool,
    pub volume: u8,
    pub lyrics: LyricsView<'a>,
    pub status: Option<&'a str>,
}
