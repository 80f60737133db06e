//! Application module: the playlist view model used by the TUI and runtime.
//!
//! Playback itself lives in `playback`; `App` only knows which row the
//! cursor is on and what the filter shows.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
