//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! beach-config.toml file. It provides a centralized way to configure the
//! data-source endpoints, search behaviour and output options.
//!
//! Every field has a default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, resolved against the working directory
pub const CONFIG_FILE: &str = "beach-config.toml";

/// Errors raised while writing configuration back to disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration loaded from beach-config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Remote data-source settings
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Place search settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Output settings for the command-line front end
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Open-Meteo endpoint configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Base URL of the air forecast API (`/forecast` is appended)
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Base URL of the marine API (`/marine` is appended)
    #[serde(default = "default_marine_url")]
    pub marine_url: String,
    /// Base URL of the geocoding API (`/search` is appended)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Days of forecast to request and keep (capped at 7)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

/// Place search configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Idle time before a query edit is searched, milliseconds (minimum 300)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Result cap for both the geocoder and the fallback list (at most 10)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Print JSON instead of text panels
    #[serde(default)]
    pub json: bool,
    /// Include the multi-day forecast in weather output
    #[serde(default)]
    pub show_forecast: bool,
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_marine_url() -> String {
    "https://marine-api.open-meteo.com/v1".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_forecast_days() -> u8 {
    7
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_max_results() -> usize {
    10
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            marine_url: default_marine_url(),
            geocoding_url: default_geocoding_url(),
            timeout_secs: default_timeout_secs(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl SourcesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_results: default_max_results(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load configuration from beach-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), "invalid config file format, using defaults: {e}");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
