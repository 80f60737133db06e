//! Playback coordination: the session state machine, the position clock
//! and next/previous selection.
//!
//! The `Controller` sits between the key bindings and the decoder engine.
//! It owns the session, estimates the position from wall-clock ticks and
//! moves on to the next track when the estimate reaches the track length
//! or the decoder exits on its own, whichever is seen first.

mod clock;
mod controller;
mod shuffle;
mod types;

pub use clock::{Clock, SystemClock, spawn_ticker};
pub use controller::Controller;
pub use shuffle::ShuffleSelector;
pub use types::*;

#[cfg(test)]
pub(crate) use clock::ManualClock;
