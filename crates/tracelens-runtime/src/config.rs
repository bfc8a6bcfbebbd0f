use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_RUNS_DIR: &str = ".agk/runs";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

pub const RUNS_DIR_ENV: &str = "TRACELENS_RUNS_DIR";
pub const CONFIG_ENV: &str = "TRACELENS_CONFIG";

/// Resolve the runs directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. TRACELENS_RUNS_DIR environment variable (with tilde expansion)
/// 3. `runs_dir` from the config file
/// 4. `.agk/runs` relative to the working directory
pub fn resolve_runs_dir(explicit: Option<&str>, config: &Config) -> PathBuf {
    if let Some(path) = explicit {
        return expand_tilde(path);
    }

    if let Ok(env_path) = std::env::var(RUNS_DIR_ENV)
        && !env_path.is_empty()
    {
        return expand_tilde(&env_path);
    }

    expand_tilde(&config.runs_dir)
}

/// Resolve the config file path based on priority:
/// 1. Explicit path
/// 2. TRACELENS_CONFIG environment variable
/// 3. `<config dir>/tracelens/config.toml`
pub fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV)
        && !env_path.is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("tracelens").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".tracelens").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME or config directory found".to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runs_dir: String,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runs_dir: DEFAULT_RUNS_DIR.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Config {
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let path = resolve_config_path(explicit)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Live-tail tick. Clamped to at least 50ms so a bad value cannot spin.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(50))
    }
}
