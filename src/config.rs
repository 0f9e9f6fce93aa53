// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether newly created projects get a backlog.
    #[serde(default = "default_true")]
    pub backlog_enabled: bool,
    /// Map an "In Progress" state onto an existing, differently-cased root tag.
    #[serde(default = "default_true")]
    pub reuse_default_in_progress_tag: bool,
    /// Store file location. Defaults to `store.json` in the data directory.
    #[serde(default)]
    pub store_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backlog_enabled: true,
            reuse_default_in_progress_tag: true,
            store_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk. A missing file yields the defaults.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        Ok(config)
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        LocalStorage::with_lock(&path, || LocalStorage::atomic_write(&path, toml_str))?;
        Ok(())
    }

    /// Where the local store lives: the configured file, or the context default.
    pub fn store_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.store_file {
            Some(path) => Ok(path.clone()),
            None => ctx.get_store_path(),
        }
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
