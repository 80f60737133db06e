//! The decoder process controller.
//!
//! A `Backend` knows how to start one decoder process for a file at an
//! offset. The process itself can only be killed or waited on: there is no
//! control channel, so pausing and seeking are built on top by the engine.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::types::{EngineError, LaunchRequest};

/// How often a waiting watcher re-checks the child for exit.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// One running (or finished) decoder process.
pub trait BackendProcess: Send + Sync {
    /// OS process id, for logging.
    fn id(&self) -> u32;

    /// Terminate the process and reap it before returning.
    ///
    /// Safe to call more than once and safe to call after the process has
    /// already exited.
    fn kill(&self);

    /// Block until the process exits, either naturally or because it was killed.
    fn wait(&self);
}

/// Starts decoder processes.
pub trait Backend: Send + Sync {
    fn spawn(&self, request: &LaunchRequest<'_>) -> Result<Arc<dyn BackendProcess>, EngineError>;
}

/// Build the decoder argument vector for `request`.
///
/// Order matters: no video window, exit at end of stream, quiet logging,
/// volume, optional start offset, then the file.
pub fn decoder_args(request: &LaunchRequest<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-nodisp".into(),
        "-autoexit".into(),
        "-loglevel".into(),
        "quiet".into(),
        "-volume".into(),
        request.volume.min(100).to_string().into(),
    ];
    if request.offset > 0.0 {
        args.push("-ss".into());
        args.push(format!("{:.2}", request.offset).into());
    }
    args.push(request.path.as_os_str().to_owned());
    args
}

/// `ffplay`-compatible backend using real subprocesses.
pub struct FfplayBackend {
    program: PathBuf,
}

impl FfplayBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Backend for FfplayBackend {
    fn spawn(&self, request: &LaunchRequest<'_>) -> Result<Arc<dyn BackendProcess>, EngineError> {
        let child = Command::new(&self.program)
            .args(decoder_args(request))
            // The terminal belongs to the TUI.
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        debug!(
            pid = child.id(),
            path = %request.path.display(),
            offset = request.offset,
            volume = request.volume,
            "decoder started"
        );

        Ok(Arc::new(ChildProcess {
            pid: child.id(),
            child: Mutex::new(child),
        }))
    }
}

struct ChildProcess {
    pid: u32,
    child: Mutex<Child>,
}

impl ChildProcess {
    fn child(&self) -> MutexGuard<'_, Child> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BackendProcess for ChildProcess {
    fn id(&self) -> u32 {
        self.pid
    }

    fn kill(&self) {
        let mut child = self.child();
        if let Ok(None) = child.try_wait() {
            if let Err(e) = child.kill() {
                warn!(pid = self.pid, error = %e, "failed to kill decoder");
            }
        }
        // Reap so the audio device is released before anyone relaunches.
        let _ = child.wait();
    }

    fn wait(&self) {
        // Poll instead of holding the lock inside a blocking wait, so `kill`
        // from another thread is never stuck behind the watcher.
        loop {
            match self.child().try_wait() {
                Ok(None) => {}
                Ok(Some(_)) | Err(_) => return,
            }
            thread::sleep(WAIT_POLL);
        }
    }
}
