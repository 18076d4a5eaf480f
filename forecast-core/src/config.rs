use anyhow::{Context, Result, anyhow};
use chrono::{FixedOffset, Local, Offset};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::provider::{ClientSettings, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, Units};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "FORECAST_API_KEY";

/// Locations shown when neither the config nor the command line names any.
pub const DEFAULT_LOCATIONS: &[&str] = &[
    "Marlboro,MA,US",
    "San Diego,CA,US",
    "Cheyenne,WY,US",
    "Anchorage,AK,US",
    "Austin,TX,US",
    "Orlando,FL,US",
    "Seattle,WA,US",
    "Cleveland,OH,US",
    "Portland,ME,US",
    "Honolulu,HI,US",
];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "imperial"
/// timeout_secs = 10
/// utc_offset = "-05:00"
/// locations = ["Austin,TX,US", "Seattle,WA,US"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub units: Units,
    pub timeout_secs: u64,
    /// Reference offset for "today", e.g. `"+02:00"`. Local offset when absent.
    pub utc_offset: Option<String>,
    /// Forecast endpoint override.
    pub endpoint: Option<String>,
    pub locations: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            utc_offset: None,
            endpoint: None,
            locations: DEFAULT_LOCATIONS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Key from `env_key` if set, otherwise the stored one. Blank keys count as missing.
    pub fn effective_api_key(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Settings for the forecast client, reading [`API_KEY_ENV`] from the environment.
    pub fn client_settings(&self) -> Result<ClientSettings> {
        self.client_settings_with_key(std::env::var(API_KEY_ENV).ok())
    }

    pub fn client_settings_with_key(&self, env_key: Option<String>) -> Result<ClientSettings> {
        let api_key = self.effective_api_key(env_key).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `forecast configure` or set {API_KEY_ENV}."
            )
        })?;

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        Ok(ClientSettings {
            api_key,
            units: self.units,
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// Offset that decides where "today" ends. Falls back to the local offset.
    pub fn reference_offset(&self) -> Result<FixedOffset> {
        match &self.utc_offset {
            Some(raw) => parse_offset(raw),
            None => Ok(Local::now().offset().fix()),
        }
    }
}

/// Parse an offset such as `"+05:30"` or `"-04:00"`.
pub fn parse_offset(raw: &str) -> Result<FixedOffset> {
    raw.trim()
        .parse::<FixedOffset>()
        .map_err(|err| anyhow!("Invalid UTC offset '{raw}' ({err}); expected e.g. +02:00"))
}
