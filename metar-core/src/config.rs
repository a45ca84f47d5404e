use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::format::OutputFormat;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// default_format = "json"
/// skip_invalid = true
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default output format, e.g. "text", "detail" or "json".
    pub default_format: Option<String>,

    /// Skip lines that fail to decode instead of stopping at the first one.
    #[serde(default)]
    pub skip_invalid: bool,
}

impl Config {
    /// Return the default output format as a strongly-typed OutputFormat.
    ///
    /// Falls back to [`OutputFormat::Text`] when nothing is configured.
    pub fn default_format_id(&self) -> Result<OutputFormat> {
        match self.default_format.as_deref() {
            Some(s) => OutputFormat::try_from(s).context(
                "Invalid default_format in config.\n\
                 Hint: run `metar configure --format <text|detail|json>` to fix it.",
            ),
            None => Ok(OutputFormat::default()),
        }
    }

    /// Store default output format as string.
    pub fn set_default_format(&mut self, format: OutputFormat) {
        self.default_format = Some(format.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "metar", "metar-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
