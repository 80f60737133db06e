//! Settings for the decoder, playback clock, library scan, lyrics and
//! logging, read from `config.toml` and `STELLE__*` environment variables.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
