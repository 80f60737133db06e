use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/stelle/config.toml` or `~/.config/stelle/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `STELLE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub lyrics: LyricsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Decoder executable, looked up on `PATH` unless it contains a slash.
    pub program: String,
    /// Start volume, 0..=100.
    pub volume: u8,
    /// How much `+` / `-` change the volume.
    pub volume_step: u8,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            program: "ffplay".to_string(),
            volume: 100,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Position clock period (milliseconds). Must stay below one second.
    pub tick_ms: u64,
    /// Number of seconds to jump when pressing the seek keys.
    pub seek_seconds: u64,
    /// Start playing the first track as soon as the library is loaded.
    pub autoplay: bool,
    /// Further seeks are ignored for this long after one is issued.
    pub seek_debounce_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            tick_ms: 100,
            seek_seconds: 5,
            autoplay: true,
            seek_debounce_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "m4a", "flac", "wav", "ogg", "aac", "opus"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    pub enabled: bool,
    /// Ask the remote service when nothing is cached locally.
    pub remote: bool,
    /// Base URL of an lrclib-compatible service.
    pub api_url: String,
    /// Cache directory name, relative to the music directory.
    pub dir_name: String,
    pub timeout_secs: u64,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: true,
            api_url: "https://lrclib.net".to_string(),
            dir_name: "lyrics".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `stelle=debug`.
    /// `STELLE_LOG` overrides it.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/stelle/stelle.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
