//! Runtime configuration for the gym watcher.
//!
//! Loaded from `watch_config.json` with support for an environment variable override.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_WATCH_CONFIG: &str = include_str!("data/watch_config.json");

pub const CONFIG_PATH_ENV: &str = "GYM_WATCH_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    /// Base URL of the server exposing `/gyms`.
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Offset applied to server timestamps before they are displayed.
    pub utc_offset_hours: i32,
    /// Maximum number of feed lines kept in memory.
    pub feed_capacity: usize,
    pub map: MapConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 5000,
            request_timeout_ms: 10_000,
            utc_offset_hours: 2,
            feed_capacity: 200,
            map: MapConfig::default(),
        }
    }
}

/// Initial view of the map.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [42.878593, -8.519403],
            zoom: 14,
        }
    }
}

impl WatchConfig {
    pub fn builtin() -> Self {
        match Self::from_json_str(BUILTIN_WATCH_CONFIG) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(
                    target: "gym_watch::config",
                    error = %err,
                    "watch_config.builtin_invalid"
                );
                Self::default()
            }
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = WatchConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse watch config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read watch config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load the watch configuration from an explicit path, the environment, or the builtin copy.
///
/// Returns the config together with the file it came from, if any.
pub fn load_watch_config(explicit: Option<&Path>) -> (WatchConfig, Option<PathBuf>) {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

    if let Some(path) = candidate {
        match WatchConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "gym_watch::config",
                    path = %path.display(),
                    "watch_config.loaded=file"
                );
                return (config, Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "gym_watch::config",
                    path = %path.display(),
                    error = %err,
                    "watch_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "gym_watch::config", "watch_config.loaded=builtin");
    (WatchConfig::builtin(), None)
}
