//! Configuration loaded from `homebase.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HomebaseError, Result};

/// Default bound on the persisted command history.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomebaseConfig {
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Terminal defaults. Runtime settings in the store take precedence.
#[derive(Debug, Clone, Deserialize)]
pub struct TerminalConfig {
    /// User name shown in the prompt when `terminal.name` is unset.
    #[serde(default = "default_guest")]
    pub name: String,
    /// Machine name shown in the prompt when `terminal.machine` is unset.
    #[serde(default = "default_guest")]
    pub machine: String,
    /// History bound when the `maxhistory` setting is unset.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

/// Where the persistent store lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_guest() -> String {
    "guest".to_string()
}
fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}
fn default_store_path() -> PathBuf {
    PathBuf::from("homebase.json")
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            name: default_guest(),
            machine: default_guest(),
            max_history: default_max_history(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl HomebaseConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.terminal.max_history == 0 {
            return Err(HomebaseError::Config(
                "terminal.max_history must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
