//! `.lrc` files cached next to the music library.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::model::{Lyrics, LyricsError};
use super::parse::parse;

fn track_number_prefix() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\d+\s*-?\s*").expect("prefix pattern is valid"))
}

/// Directory holding cached lyrics for the library rooted at `music_dir`.
pub fn lyrics_dir(music_dir: &Path, dir_name: &str) -> PathBuf {
    music_dir.join(dir_name)
}

/// Strip a leading track number such as `01 - ` or `7 ` from a file stem.
pub fn clean_name(stem: &str) -> String {
    track_number_prefix().replace(stem, "").into_owned()
}

fn stem(song_path: &Path) -> String {
    song_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Candidate cache files for `song_path`, most specific first.
pub(crate) fn candidates(song_path: &Path, dir: &Path) -> Vec<PathBuf> {
    let raw = stem(song_path);
    let clean = clean_name(&raw);

    let mut names: Vec<String> = Vec::new();
    for name in [
        clean.clone(),
        raw.clone(),
        clean.to_lowercase(),
        raw.to_lowercase(),
    ] {
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    names
        .into_iter()
        .map(|n| dir.join(format!("{n}.lrc")))
        .collect()
}

/// Look for a cached `.lrc` for `song_path` under `dir`.
///
/// Files that are missing, unreadable or contain no timed lines are skipped.
pub fn load_cached(song_path: &Path, dir: &Path) -> Option<Lyrics> {
    for candidate in candidates(song_path, dir) {
        let Ok(content) = fs::read_to_string(&candidate) else {
            continue;
        };
        let lines = parse(&content);
        if lines.is_empty() {
            debug!(path = %candidate.display(), "cached lyrics have no timed lines");
            continue;
        }
        debug!(path = %candidate.display(), lines = lines.len(), "lyrics cache hit");
        return Some(Lyrics::from_lines(lines));
    }
    None
}

/// Write `content` as the cached lyrics for `song_path`, returning the file written.
pub fn save_cached(song_path: &Path, dir: &Path, content: &str) -> Result<PathBuf, LyricsError> {
    fs::create_dir_all(dir)?;
    let name = clean_name(&stem(song_path));
    let path = dir.join(format!("{name}.lrc"));
    fs::write(&path, content)?;
    Ok(path)
}
