//! Checks that run before the terminal is taken over.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::config::{LibrarySettings, LyricsSettings};
use crate::library::Track;
use crate::lyrics::{LrclibClient, LyricsFetcher, LyricsProvider, lyrics_dir};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("`{program}` was not found {location}. Install FFmpeg or point --decoder-dir at it.")]
    DecoderNotFound { program: String, location: String },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error(
        "No music files found in {}. Supported formats: {}",
        .dir.display(),
        .formats.join(", ")
    )]
    EmptyLibrary { dir: PathBuf, formats: Vec<String> },
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_in(dir: &Path, program: &str) -> Option<PathBuf> {
    let candidate = dir.join(program);
    if is_executable(&candidate) {
        return Some(candidate);
    }
    if cfg!(windows) {
        let exe = dir.join(format!("{program}.exe"));
        if is_executable(&exe) {
            return Some(exe);
        }
    }
    None
}

/// Locate the decoder executable.
///
/// `decoder_dir` wins when given. A `program` containing a path separator
/// is used as is; otherwise each entry of `path_var` is searched.
pub fn resolve_decoder(
    program: &str,
    decoder_dir: Option<&Path>,
    path_var: Option<&OsStr>,
) -> Result<PathBuf, StartupError> {
    if let Some(dir) = decoder_dir {
        return find_in(dir, program).ok_or_else(|| StartupError::DecoderNotFound {
            program: program.to_string(),
            location: format!("in {}", dir.display()),
        });
    }

    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        return if is_executable(as_path) {
            Ok(as_path.to_path_buf())
        } else {
            Err(StartupError::DecoderNotFound {
                program: program.to_string(),
                location: format!("at {}", as_path.display()),
            })
        };
    }

    path_var
        .into_iter()
        .flat_map(env::split_paths)
        .find_map(|dir| find_in(&dir, program))
        .ok_or_else(|| StartupError::DecoderNotFound {
            program: program.to_string(),
            location: "on PATH".to_string(),
        })
}

/// The music directory to scan: the one asked for, else the working
/// directory.
pub fn music_dir(requested: Option<PathBuf>) -> Result<PathBuf, StartupError> {
    let dir = requested
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    if !dir.is_dir() {
        return Err(StartupError::NotADirectory(dir));
    }
    Ok(dir)
}

pub fn ensure_tracks(
    tracks: &[Track],
    dir: &Path,
    settings: &LibrarySettings,
) -> Result<(), StartupError> {
    if tracks.is_empty() {
        return Err(StartupError::EmptyLibrary {
            dir: dir.to_path_buf(),
            formats: settings.extensions.iter().map(|e| format!(".{e}")).collect(),
        });
    }
    Ok(())
}

/// Build the lyric loader the settings ask for, or `None` when lyrics are
/// off. A remote client that cannot be built degrades to cache-only.
pub fn lyrics_fetcher(music_dir: &Path, settings: &LyricsSettings) -> Option<LyricsFetcher> {
    if !settings.enabled {
        return None;
    }
    let provider: Option<Arc<dyn LyricsProvider>> = if settings.remote {
        match LrclibClient::new(&settings.api_url, Duration::from_secs(settings.timeout_secs)) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "remote lyrics disabled");
                None
            }
        }
    } else {
        None
    };
    Some(LyricsFetcher::new(
        lyrics_dir(music_dir, &settings.dir_name),
        provider,
    ))
}
