//! Generator settings
//!
//! Read from `<config dir>/sqlgen/config.toml`. Every key is optional, and a
//! missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use sqlgen_designer::{ManyToManyPairing, ResolverOptions};

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("sqlgen"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// SQLite database path, or `:memory:`
    pub database: String,
    pub many_to_many_pairing: ManyToManyPairing,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            database: ":memory:".to_string(),
            many_to_many_pairing: ManyToManyPairing::Optional,
            log_filter: "info".to_string(),
        }
    }
}

impl GeneratorSettings {
    pub fn settings_path() -> Result<PathBuf> {
        config_dir().map(|p| p.join("config.toml"))
    }

    /// Load settings from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::settings_path()?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse settings in {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::default().with_pairing(self.many_to_many_pairing)
    }
}
