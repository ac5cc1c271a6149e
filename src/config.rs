//! Runlog configuration.
//!
//! A log directory is resolved through a chain, so scripts and interactive
//! sessions can omit it:
//!
//! 1. An explicit path passed by the caller
//! 2. The `RUNLOG_DIR` env var — process/session level
//! 3. `~/.runlog/config.toml` — global default
//! 4. `~/.runlog/logs` — the built-in fallback
//!
//! A missing config file is not an error; an unreadable or invalid one is.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};

/// Runlog configuration, loaded from `~/.runlog/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Base directory for root loggers.
    pub log_directory: Option<PathBuf>,

    /// Path to the commit database used for tagging logs.
    pub commit_db: Option<PathBuf>,
}

impl Config {
    /// Loads the config file, or defaults if it doesn't exist.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads a config file from the given path, or defaults if it doesn't
    /// exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };
        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.runlog/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".runlog").join("config.toml"))
    }
}

/// The built-in fallback log directory: `~/.runlog/logs`.
pub fn default_log_directory() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".runlog").join("logs"))
}

/// Resolves the base log directory through the tiered chain: explicit value,
/// `RUNLOG_DIR`, config file, built-in default.
pub fn resolve_log_directory(explicit: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(dir) = env::var("RUNLOG_DIR")
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if let Some(dir) = Config::load()?.log_directory {
        return Ok(dir);
    }

    default_log_directory().ok_or_else(|| "could not determine home directory".to_string())
}
