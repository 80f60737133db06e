//! Time-synced lyrics: LRC parsing, line lookup by elapsed time, the
//! on-disk `.lrc` cache and the remote lookup used to fill it.

mod cache;
mod loader;
mod model;
mod parse;
mod remote;
mod sync;

pub use cache::{clean_name, load_cached, lyrics_dir, save_cached};
pub use loader::LyricsFetcher;
pub use model::*;
pub use parse::parse;
pub use remote::{LrclibClient, LyricsProvider};
pub use sync::current_and_next;

#[cfg(test)]
mod tests;
