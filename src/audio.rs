//! Decoder-backed playback.
//!
//! There is no in-process audio pipeline here. Every play, resume or seek
//! launches a fresh decoder process at the requested offset, and the engine
//! keeps track of which launch is the live one.

mod backend;
mod engine;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{Backend, BackendProcess, FfplayBackend, decoder_args};
pub use engine::PlaybackEngine;
pub use types::*;
