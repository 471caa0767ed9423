// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Daemon configuration: state directory resolution plus an optional
//! `config.toml` overlay, keeping a small set of env var overrides
//! separate from fixed, predictable paths.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure loading or resolving daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory: set CRONSPINE_STATE_DIR or HOME")]
    NoStateDir,
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
}

/// Which `Storage` backend the daemon constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Durable, single-node: `jobs.sled` under the state directory.
    Sled,
    /// Non-durable, for smoke-testing a config without touching disk.
    Memory,
}

/// Daemon configuration.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identity passed to every `Storage` call.
    pub scheduler_id: String,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    pub storage: StorageKind,
    /// Demand the broadcaster keeps outstanding against the registry's
    /// mutation-event stream.
    pub upstream_buffer: usize,
    /// Buffer size for the daemon's own internal log-consumer subscription.
    pub downstream_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler_id: "default".to_string(),
            log_filter: "info".to_string(),
            storage: StorageKind::Sled,
            upstream_buffer: 64,
            downstream_buffer: 64,
        }
    }
}

impl Config {
    /// Resolve the state directory: `CRONSPINE_STATE_DIR` > `XDG_STATE_HOME` > `~/.local/state/cronspine`.
    pub fn state_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("CRONSPINE_STATE_DIR") {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = dirs::state_dir() {
            return Ok(dir.join("cronspine"));
        }
        dirs::home_dir()
            .map(|home| home.join(".local/state/cronspine"))
            .ok_or(ConfigError::NoStateDir)
    }

    /// Load configuration: built-in defaults, overlaid by `config.toml` in
    /// the state directory if one exists. A missing file is not an error —
    /// only a malformed one is.
    pub fn load(state_dir: &Path) -> Result<Self, ConfigError> {
        let path = state_dir.join("config.toml");
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn sled_path(&self, state_dir: &Path) -> PathBuf {
        state_dir.join("jobs.sled")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
