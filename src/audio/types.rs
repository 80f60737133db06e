//! Small types shared by the decoder backend and the playback engine.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Playback state as seen by the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Identity of one decoder launch.
///
/// Every launch gets a fresh, strictly increasing value. Completion events
/// carry the generation they were produced for, so an event from a process
/// that has since been replaced can be told apart from the live one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the decoder needs to start one process.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    pub path: &'a Path,
    /// Start offset in seconds.
    pub offset: f64,
    /// Output volume, 0..=100.
    pub volume: u8,
}

/// A decoder process ran to the end of its stream on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub generation: Generation,
    pub path: PathBuf,
}

pub type CompletionCallback = Arc<dyn Fn(Completion) + Send + Sync>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch decoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to start completion watcher: {0}")]
    Watcher(#[source] io::Error),
}
