//! Logical play/pause/resume/seek on top of a start-and-kill backend.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::{debug, info};

use super::backend::{Backend, BackendProcess};
use super::types::{
    Completion, CompletionCallback, EngineError, EngineState, Generation, LaunchRequest,
};

struct LiveProcess {
    generation: Generation,
    process: Arc<dyn BackendProcess>,
}

struct EngineInner {
    state: EngineState,
    live: Option<LiveProcess>,
    next_generation: Generation,
    /// Last launched file. Kept across pause and stop so resume can relaunch.
    path: Option<PathBuf>,
    on_complete: Option<CompletionCallback>,
}

impl EngineInner {
    fn kill_live(&mut self) {
        if let Some(live) = self.live.take() {
            debug!(generation = %live.generation, pid = live.process.id(), "killing decoder");
            live.process.kill();
        }
    }
}

/// Playback engine driving one decoder process at a time.
///
/// Pause is emulated by killing the process and resume by relaunching at a
/// remembered offset. Each launch is tagged with a [`Generation`]; the
/// completion callback only fires for the launch that is still current and
/// still playing when its process exits.
pub struct PlaybackEngine {
    backend: Arc<dyn Backend>,
    inner: Arc<Mutex<EngineInner>>,
}

impl PlaybackEngine {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            inner: Arc::new(Mutex::new(EngineInner {
                state: EngineState::Stopped,
                live: None,
                next_generation: Generation::first(),
                path: None,
                on_complete: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start `path` at `seek_to` seconds, replacing whatever is running.
    pub fn play(&self, path: &Path, seek_to: f64, volume: u8) -> Result<Generation, EngineError> {
        let mut inner = self.lock();
        self.launch(&mut inner, path.to_path_buf(), seek_to, volume)
    }

    /// Kill the running process, if any, and go to `Stopped`.
    pub fn stop(&self) {
        let mut inner = self.lock();
        inner.kill_live();
        inner.state = EngineState::Stopped;
    }

    /// Kill the running process but remember the file so it can be resumed.
    pub fn pause(&self) {
        let mut inner = self.lock();
        inner.kill_live();
        inner.state = EngineState::Paused;
    }

    /// Relaunch the remembered file at `seek_to`.
    ///
    /// Returns `Ok(None)` without doing anything unless the engine is paused
    /// and has a file to resume.
    pub fn resume(&self, seek_to: f64, volume: u8) -> Result<Option<Generation>, EngineError> {
        let mut inner = self.lock();
        if inner.state != EngineState::Paused {
            return Ok(None);
        }
        let Some(path) = inner.path.clone() else {
            return Ok(None);
        };
        self.launch(&mut inner, path, seek_to, volume).map(Some)
    }

    /// Move to `position` seconds.
    ///
    /// Only a playing engine relaunches; when paused or stopped the caller's
    /// stored position is all that changes, so this returns `Ok(None)`.
    pub fn seek(&self, position: f64, volume: u8) -> Result<Option<Generation>, EngineError> {
        let mut inner = self.lock();
        let Some(path) = inner.path.clone() else {
            return Ok(None);
        };
        if inner.state != EngineState::Playing {
            return Ok(None);
        }
        self.launch(&mut inner, path, position, volume).map(Some)
    }

    pub fn state(&self) -> EngineState {
        self.lock().state
    }

    /// Generation of the live process, if one is running.
    pub fn generation(&self) -> Option<Generation> {
        self.lock().live.as_ref().map(|l| l.generation)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    /// Replace the natural-completion notification target.
    pub fn set_on_complete(&self, callback: CompletionCallback) {
        self.lock().on_complete = Some(callback);
    }

    fn launch(
        &self,
        inner: &mut EngineInner,
        path: PathBuf,
        seek_to: f64,
        volume: u8,
    ) -> Result<Generation, EngineError> {
        inner.kill_live();
        inner.path = Some(path.clone());

        let request = LaunchRequest {
            path: &path,
            offset: seek_to.max(0.0),
            volume: volume.min(100),
        };
        let process = match self.backend.spawn(&request) {
            Ok(p) => p,
            Err(e) => {
                inner.state = EngineState::Stopped;
                return Err(e);
            }
        };

        let generation = inner.next_generation;
        inner.next_generation = generation.next();

        let shared = Arc::clone(&self.inner);
        let watched = Arc::clone(&process);
        let watched_path = path.clone();
        let spawned = thread::Builder::new()
            .name(format!("decoder-watch-{generation}"))
            .spawn(move || watch(shared, watched, generation, watched_path));
        if let Err(e) = spawned {
            process.kill();
            inner.state = EngineState::Stopped;
            return Err(EngineError::Watcher(e));
        }

        info!(%generation, path = %path.display(), offset = request.offset, "playing");
        inner.live = Some(LiveProcess {
            generation,
            process,
        });
        inner.state = EngineState::Playing;
        Ok(generation)
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.lock().kill_live();
    }
}

/// Completion watcher for one launch.
fn watch(
    shared: Arc<Mutex<EngineInner>>,
    process: Arc<dyn BackendProcess>,
    generation: Generation,
    path: PathBuf,
) {
    process.wait();

    let callback = {
        let mut inner = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let is_live = inner
            .live
            .as_ref()
            .is_some_and(|l| l.generation == generation);
        if !is_live || inner.state != EngineState::Playing {
            debug!(%generation, "superseded decoder exited");
            return;
        }
        inner.live = None;
        inner.state = EngineState::Stopped;
        inner.on_complete.clone()
    };

    debug!(%generation, "decoder reached end of stream");
    // Outside the lock: the callback may call straight back into the engine.
    if let Some(callback) = callback {
        callback(Completion { generation, path });
    }
}
