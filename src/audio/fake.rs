//! In-memory decoder backend for tests.
//!
//! Processes never touch the OS: they block in `wait` until the test calls
//! `finish` (natural end of stream) or the engine calls `kill`.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use super::backend::{Backend, BackendProcess};
use super::types::{EngineError, LaunchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Running,
    Finished,
    Killed,
}

pub struct FakeProcess {
    pub pid: u32,
    pub path: PathBuf,
    pub offset: f64,
    pub volume: u8,
    exit: Mutex<Exit>,
    changed: Condvar,
}

impl FakeProcess {
    fn set_exit(&self, exit: Exit) {
        let mut current = self.exit.lock().unwrap();
        if *current == Exit::Running {
            *current = exit;
        }
        self.changed.notify_all();
    }

    /// Simulate the decoder reaching the end of the file.
    pub fn finish(&self) {
        self.set_exit(Exit::Finished);
    }

    pub fn exit(&self) -> Exit {
        *self.exit.lock().unwrap()
    }
}

impl BackendProcess for FakeProcess {
    fn id(&self) -> u32 {
        self.pid
    }

    fn kill(&self) {
        self.set_exit(Exit::Killed);
    }

    fn wait(&self) {
        let mut exit = self.exit.lock().unwrap();
        while *exit == Exit::Running {
            exit = self.changed.wait(exit).unwrap();
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    spawned: Mutex<Vec<Arc<FakeProcess>>>,
    next_pid: AtomicU32,
    fail: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following spawn fail until reset.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn spawned(&self) -> Vec<Arc<FakeProcess>> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }

    pub fn last(&self) -> Arc<FakeProcess> {
        self.spawned
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no process spawned")
    }
}

impl Backend for FakeBackend {
    fn spawn(&self, request: &LaunchRequest<'_>) -> Result<Arc<dyn BackendProcess>, EngineError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Spawn {
                program: "fake".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "fake decoder missing"),
            });
        }
        let process = Arc::new(FakeProcess {
            pid: self.next_pid.fetch_add(1, Ordering::SeqCst) + 1,
            path: request.path.to_path_buf(),
            offset: request.offset,
            volume: request.volume,
            exit: Mutex::new(Exit::Running),
            changed: Condvar::new(),
        });
        self.spawned.lock().unwrap().push(Arc::clone(&process));
        Ok(process)
    }
}
