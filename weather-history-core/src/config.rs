use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    provider::{
        DEFAULT_TIMEOUT_SECS, archive::DEFAULT_ARCHIVE_URL, geocoding::DEFAULT_GEOCODING_URL,
    },
    range::RangeCode,
};

/// Base URLs of the remote services.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub geocoding_url: Option<String>,
    pub archive_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Range selector value used when none is given, e.g. `6`.
    pub default_range: Option<u32>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Example TOML:
    /// [endpoints]
    /// archive_url = "https://archive-api.open-meteo.com"
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Configured default range; unknown stored values fall back like any other selector value.
    pub fn default_range(&self) -> RangeCode {
        self.default_range
            .map(RangeCode::resolve)
            .unwrap_or_default()
    }

    pub fn set_default_range(&mut self, code: RangeCode) {
        self.default_range = Some(code.value());
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn geocoding_url(&self) -> &str {
        self.endpoints
            .geocoding_url
            .as_deref()
            .unwrap_or(DEFAULT_GEOCODING_URL)
    }

    pub fn archive_url(&self) -> &str {
        self.endpoints
            .archive_url
            .as_deref()
            .unwrap_or(DEFAULT_ARCHIVE_URL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
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

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
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
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted recent-searches list.
    pub fn recent_searches_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("recent_searches.json"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-history", "weather-history")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
