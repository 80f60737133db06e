use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `STELLE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("STELLE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.tick_ms == 0 {
            return Err("playback.tick_ms must be >= 1".to_string());
        }
        // Deltas of a second or more are discarded by the position clock.
        if self.playback.tick_ms >= 1000 {
            return Err("playback.tick_ms must be < 1000".to_string());
        }
        if self.backend.volume > 100 {
            return Err("backend.volume must be <= 100".to_string());
        }
        if self.backend.program.trim().is_empty() {
            return Err("backend.program must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `STELLE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("STELLE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        return Some(PathBuf::from(dir));
    }
    env::var_os("HOME").map(|home| home_fallback.iter().fold(PathBuf::from(home), |p, c| p.join(c)))
}

/// Compute the default config path under `$XDG_CONFIG_HOME/stelle/config.toml`
/// or `~/.config/stelle/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("stelle").join("config.toml"))
}

/// Default log file: `$XDG_STATE_HOME/stelle/stelle.log` or
/// `~/.local/state/stelle/stelle.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|d| d.join("stelle").join("stelle.log"))
}
