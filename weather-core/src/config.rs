use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use url::Url;

use crate::{
    coordinator::SearchConfig,
    model::Coordinates,
    request::{DEFAULT_COUNTRY_CODE, default_endpoint},
    units::TemperatureUnit,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// country_code = "US"
/// unit = "fahrenheit"
///
/// [home]
/// latitude = 40.7128
/// longitude = -74.006
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Country appended to city searches. Empty disables the suffix.
    pub country_code: String,

    pub unit: TemperatureUnit,

    /// Override for the OpenWeather endpoint, mostly for testing.
    pub endpoint: Option<String>,

    /// Position used for "weather here" when none is given explicitly.
    pub home: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            unit: TemperatureUnit::default(),
            endpoint: None,
            home: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with_override(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn endpoint_url(&self) -> Result<Url> {
        match &self.endpoint {
            Some(raw) => Url::parse(raw).with_context(|| format!("Invalid endpoint URL '{raw}'")),
            None => Ok(default_endpoint()),
        }
    }

    /// Build the coordinator configuration, failing if no API key is known.
    pub fn search_config(&self) -> Result<SearchConfig> {
        self.search_config_with_key(self.resolve_api_key())
    }

    fn search_config_with_key(&self, api_key: Option<String>) -> Result<SearchConfig> {
        let api_key = api_key.ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })?;

        let country_code = Some(self.country_code.trim().to_string()).filter(|c| !c.is_empty());

        Ok(SearchConfig { api_key, country_code, endpoint: self.endpoint_url()?, unit: self.unit })
    }
}
