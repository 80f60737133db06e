use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Environment variable that overrides `logging.level`.
pub const LOG_ENV: &str = "STELLE_LOG";

/// Build the filter from `STELLE_LOG`, falling back to the configured level
/// and then to `info`.
pub fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Send `tracing` output to the log file. The terminal belongs to the TUI,
/// so nothing is written to stdout or stderr once this succeeds.
pub fn init(settings: &LoggingSettings) -> io::Result<PathBuf> {
    let path = log_path(settings)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no log directory available"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(path)
}
