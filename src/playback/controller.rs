//! The playback state machine.
//!
//! `Controller` owns the [`PlaybackSession`] outright. Key presses call its
//! command methods and everything else arrives as a [`PlayerEvent`] through
//! [`Controller::handle`], so the session is only ever touched from the
//! event loop thread.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::audio::{Completion, EngineError, Generation, PlaybackEngine};
use crate::library::Track;
use crate::lyrics::{Lyrics, LyricsFetcher, current_and_next};

use super::clock::Clock;
use super::types::{
    ControllerOptions, LyricsView, PlaybackSession, PlaybackState, PlayerEvent, Snapshot,
};

pub struct Controller {
    tracks: Arc<[Track]>,
    engine: PlaybackEngine,
    clock: Box<dyn Clock>,
    events: Sender<PlayerEvent>,
    rng: StdRng,
    options: ControllerOptions,

    session: PlaybackSession,
    /// Generation of the launch this controller is waiting on.
    live: Option<Generation>,
    volume: u8,

    fetcher: Option<LyricsFetcher>,
    lyrics: HashMap<usize, Lyrics>,
    pending_lyrics: HashSet<usize>,

    status: Option<String>,
}

impl Controller {
    /// Build a controller around `engine`.
    ///
    /// The engine's completion callback is pointed at `events`; every
    /// completion carries its generation, so one callback serves all
    /// launches.
    pub fn new(
        tracks: Arc<[Track]>,
        engine: PlaybackEngine,
        clock: Box<dyn Clock>,
        events: Sender<PlayerEvent>,
        options: ControllerOptions,
    ) -> Self {
        let completions = events.clone();
        engine.set_on_complete(Arc::new(move |completion: Completion| {
            // The receiver is gone only during shutdown.
            let _ = completions.send(PlayerEvent::BackendFinished(completion));
        }));

        let now = clock.now();
        Self {
            tracks,
            engine,
            clock,
            events,
            rng: StdRng::from_os_rng(),
            session: PlaybackSession::new(now, options.shuffle),
            live: None,
            volume: options.volume.min(100),
            options,
            fetcher: None,
            lyrics: HashMap::new(),
            pending_lyrics: HashSet::new(),
            status: None,
        }
    }

    /// Look up lyrics for each track as it starts playing.
    pub fn with_lyrics(mut self, fetcher: LyricsFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.current
    }

    pub fn elapsed(&self) -> f64 {
        self.session.elapsed
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_shuffle(&self) -> bool {
        self.session.shuffle.is_enabled()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    fn current_track(&self) -> Option<&Track> {
        self.session.current.and_then(|i| self.tracks.get(i))
    }

    pub fn lyrics_view(&self) -> LyricsView<'_> {
        let Some(index) = self.session.current else {
            return LyricsView::NotLoaded;
        };
        if self.pending_lyrics.contains(&index) {
            return LyricsView::Loading;
        }
        match self.lyrics.get(&index) {
            None => LyricsView::NotLoaded,
            Some(l) if l.is_empty() => LyricsView::Missing,
            Some(l) => {
                let (current, next) = current_and_next(&l.lines, self.session.elapsed);
                LyricsView::Lines { current, next }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.session.state,
            index: self.session.current,
            track: self.current_track(),
            elapsed: self.session.elapsed,
            shuffle: self.is_shuffle(),
            volume: self.volume,
            lyrics: self.lyrics_view(),
            status: self.status(),
        }
    }

    /// Apply one background event.
    pub fn handle(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Tick(now) => self.on_tick(now),
            PlayerEvent::BackendFinished(completion) => self.on_backend_finished(completion),
            PlayerEvent::LyricsLoaded { path, lyrics } => self.on_lyrics_loaded(&path, lyrics),
        }
    }

    fn on_tick(&mut self, now: Instant) {
        if self
            .session
            .seek_locked_until
            .is_some_and(|until| now >= until)
        {
            self.session.seek_locked_until = None;
        }

        // `None` when the tick is older than the last one.
        let delta = now
            .checked_duration_since(self.session.last_tick)
            .map(|d| d.as_secs_f64());
        self.session.last_tick = now;

        if self.session.state != PlaybackState::Playing {
            return;
        }
        let Some(duration) = self.current_track().map(|t| t.duration) else {
            return;
        };

        if let Some(d) = delta {
            // Larger gaps mean the process was suspended or ticks piled up.
            if d > 0.0 && d < 1.0 {
                self.session.elapsed += d;
            }
        }

        if duration > 0.0 && self.session.elapsed >= duration {
            debug!(elapsed = self.session.elapsed, duration, "reached end of track");
            self.advance();
        }
    }

    fn on_backend_finished(&mut self, completion: Completion) {
        if self.session.state != PlaybackState::Playing || self.live != Some(completion.generation)
        {
            debug!(generation = %completion.generation, "ignoring stale completion");
            return;
        }
        info!(path = %completion.path.display(), "decoder finished track");
        self.live = None;
        self.advance();
    }

    fn on_lyrics_loaded(&mut self, path: &Path, lyrics: Lyrics) {
        let requested = self
            .pending_lyrics
            .iter()
            .copied()
            .find(|&i| self.tracks.get(i).is_some_and(|t| t.path == path));
        let Some(index) = requested else {
            debug!(path = %path.display(), "lyrics for unknown request");
            return;
        };
        self.pending_lyrics.remove(&index);

        if self.session.current != Some(index) {
            debug!(path = %path.display(), "discarding lyrics for a track no longer playing");
            return;
        }
        self.lyrics.insert(index, lyrics);
    }

    fn advance(&mut self) {
        if self.tracks.is_empty() {
            self.stop();
            return;
        }
        self.next();
    }

    /// Start track `index` from the beginning.
    pub fn play_index(&mut self, index: usize) {
        let Some(track) = self.tracks.get(index) else {
            return;
        };
        let path = track.path.clone();

        let now = self.clock.now();
        self.session.current = Some(index);
        self.session.elapsed = 0.0;
        self.session.last_tick = now;
        self.session.seek_locked_until = None;
        self.status = None;

        let launched = self.engine.play(&path, 0.0, self.volume);
        self.after_launch(launched);
        self.request_lyrics(index);
    }

    /// Space bar: pause, resume, or start `selected` when nothing is loaded.
    pub fn toggle_pause(&mut self, selected: usize) {
        match self.session.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => self.play_index(selected),
        }
    }

    pub fn pause(&mut self) {
        if self.session.state != PlaybackState::Playing {
            return;
        }
        self.engine.pause();
        self.live = None;
        self.session.state = PlaybackState::Paused;
    }

    /// Relaunch the paused track at the remembered position.
    pub fn resume(&mut self) {
        if self.session.state != PlaybackState::Paused {
            return;
        }
        let Some(path) = self.current_track().map(|t| t.path.clone()) else {
            return;
        };

        let offset = self.session.elapsed;
        self.session.last_tick = self.clock.now();
        self.session.seek_locked_until = None;

        let launched = match self.engine.resume(offset, self.volume) {
            Ok(Some(generation)) => Ok(generation),
            // The engine lost the file; start it over at the same offset.
            Ok(None) => self.engine.play(&path, offset, self.volume),
            Err(e) => Err(e),
        };
        self.after_launch(launched);
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.live = None;
        self.session.state = PlaybackState::Stopped;
        self.session.elapsed = 0.0;
        self.session.seek_locked_until = None;
    }

    pub fn next(&mut self) {
        let len = self.tracks.len();
        if let Some(index) = self.session.shuffle.next(self.session.current, len, &mut self.rng) {
            self.play_index(index);
        }
    }

    pub fn previous(&mut self) {
        let len = self.tracks.len();
        if let Some(index) = self.session.shuffle.previous(self.session.current, len) {
            self.play_index(index);
        }
    }

    /// Move the position by `delta` seconds.
    pub fn seek_by(&mut self, delta: f64) {
        self.seek_to(self.session.elapsed + delta);
    }

    pub fn seek_forward(&mut self) {
        self.seek_by(self.options.seek_step);
    }

    pub fn seek_backward(&mut self) {
        self.seek_by(-self.options.seek_step);
    }

    /// Jump to `position` seconds into the current track.
    ///
    /// Below zero clamps to the start; at or past the end moves on to the
    /// next track. While paused only the stored position changes.
    pub fn seek_to(&mut self, position: f64) {
        let Some(track) = self.current_track() else {
            return;
        };
        let duration = track.duration;
        let path = track.path.clone();

        let now = self.clock.now();
        if self.session.is_seeking(now) {
            debug!("seek ignored, previous seek still settling");
            return;
        }

        let target = position.max(0.0);
        if duration > 0.0 && target >= duration {
            self.session.seek_locked_until = None;
            self.next();
            return;
        }

        self.session.seek_locked_until = Some(now + self.options.seek_debounce);
        self.session.elapsed = target;

        if self.session.state != PlaybackState::Playing {
            return;
        }
        self.session.last_tick = now;
        let launched = match self.engine.seek(target, self.volume) {
            Ok(Some(generation)) => Ok(generation),
            Ok(None) => self.engine.play(&path, target, self.volume),
            Err(e) => Err(e),
        };
        self.after_launch(launched);
    }

    pub fn toggle_shuffle(&mut self) {
        let enabled = !self.session.shuffle.is_enabled();
        self.session.shuffle.set_enabled(enabled);
        info!(enabled, "shuffle toggled");
    }

    /// Change the output volume. A playing track is relaunched at the
    /// current position so the change is heard right away.
    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if volume == self.volume {
            return;
        }
        self.volume = volume;

        if self.session.state != PlaybackState::Playing {
            return;
        }
        let Some(path) = self.current_track().map(|t| t.path.clone()) else {
            return;
        };
        self.session.last_tick = self.clock.now();
        let offset = self.session.elapsed;
        let launched = match self.engine.seek(offset, volume) {
            Ok(Some(generation)) => Ok(generation),
            Ok(None) => self.engine.play(&path, offset, volume),
            Err(e) => Err(e),
        };
        self.after_launch(launched);
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.volume.saturating_add(self.options.volume_step));
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.volume.saturating_sub(self.options.volume_step));
    }

    /// Kill the decoder on the way out.
    pub fn shutdown(&mut self) {
        self.stop();
    }

    fn after_launch(&mut self, launched: Result<Generation, EngineError>) {
        match launched {
            Ok(generation) => {
                self.live = Some(generation);
                self.session.state = PlaybackState::Playing;
            }
            Err(e) => {
                warn!(error = %e, "could not start playback");
                self.live = None;
                self.session.state = PlaybackState::Stopped;
                self.status = Some(e.to_string());
            }
        }
    }

    fn request_lyrics(&mut self, index: usize) {
        let Some(fetcher) = self.fetcher.as_ref() else {
            return;
        };
        if self.lyrics.contains_key(&index) || self.pending_lyrics.contains(&index) {
            return;
        }
        let Some(track) = self.tracks.get(index) else {
            return;
        };

        let events = self.events.clone();
        let spawned = fetcher.spawn(track, move |path, lyrics| {
            let _ = events.send(PlayerEvent::LyricsLoaded { path, lyrics });
        });
        match spawned {
            Ok(()) => {
                self.pending_lyrics.insert(index);
            }
            Err(e) => {
                warn!(error = %e, "could not start lyrics lookup");
                self.lyrics.insert(index, Lyrics::empty());
            }
        }
    }
}
