//! # Open-Meteo Data Sources
//!
//! This module handles all network operations for the beach conditions
//! pipeline. Each operation is one HTTP GET that either yields a raw payload
//! or a [`SourceError`]; none of them depends on another, so callers are free
//! to run them concurrently and keep whatever succeeds.
//!
//! ## Endpoints
//!
//! | Operation            | Endpoint                       | Variables                              |
//! |----------------------|--------------------------------|----------------------------------------|
//! | [`OpenMeteoClient::fetch_air`]         | `{forecast_url}/forecast` | current air, daily max/min temperature |
//! | [`OpenMeteoClient::fetch_marine`]      | `{marine_url}/marine`     | current + hourly sea surface and waves |
//! | [`OpenMeteoClient::fetch_tide_series`] | `{marine_url}/marine`     | hourly tide height                     |
//! | [`OpenMeteoClient::geocode`]           | `{geocoding_url}/search`  | free-text place lookup                 |
//!
//! Air and marine requests use `timezone=auto`, so every timestamp in a
//! payload is local to the queried coordinates.
//!
//! ## Missing Values
//!
//! Every payload field is optional. Open-Meteo emits `null` inside hourly and
//! daily arrays when a model has no value for a slot, so array elements are
//! `Option<f64>` as well. Interpreting the gaps is left to [`crate::normalize`]
//! and [`crate::tide`].

use crate::config::SourcesConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("beach-conditions/", env!("CARGO_PKG_VERSION"));

const AIR_CURRENT: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_direction_10m";
const AIR_DAILY: &str = "temperature_2m_max,temperature_2m_min,apparent_temperature_max";
const MARINE_CURRENT: &str = "wave_height,wave_direction,sea_surface_temperature";
const MARINE_HOURLY: &str = "sea_surface_temperature,wave_height,wave_direction";
const TIDE_HOURLY: &str = "tide_height";

/// Which remote source a request targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Air,
    Marine,
    Tide,
    Geocoding,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Air => "air forecast",
            SourceKind::Marine => "marine forecast",
            SourceKind::Tide => "tide series",
            SourceKind::Geocoding => "geocoding",
        })
    }
}

/// A data source could not be reached or answered with something unusable.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network, TLS or timeout failure
    #[error("{kind} request failed: {error}")]
    Http {
        kind: SourceKind,
        #[source]
        error: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{kind} returned HTTP {status}")]
    Status { kind: SourceKind, status: u16 },

    /// Body was not the expected JSON shape
    #[error("{kind} response could not be decoded: {error}")]
    Decode {
        kind: SourceKind,
        #[source]
        error: reqwest::Error,
    },
}

/// Raw `/forecast` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirPayload {
    pub current: Option<AirCurrent>,
    pub daily: Option<AirDaily>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirCurrent {
    pub temperature_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirDaily {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature_max: Vec<Option<f64>>,
}

/// Raw `/marine` response for sea conditions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarinePayload {
    pub current: Option<MarineCurrent>,
    pub hourly: Option<MarineHourly>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarineCurrent {
    pub sea_surface_temperature: Option<f64>,
    pub wave_height: Option<f64>,
    pub wave_direction: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarineHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub sea_surface_temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub wave_height: Vec<Option<f64>>,
    #[serde(default)]
    pub wave_direction: Vec<Option<f64>>,
}

/// Raw `/marine` response for the hourly tide series.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TidePayload {
    /// Offset of the location's local time from UTC
    pub utc_offset_seconds: Option<i32>,
    pub hourly: Option<TideHourly>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TideHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub tide_height: Vec<Option<f64>>,
}

/// Raw `/search` response. `results` is omitted entirely when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingPayload {
    #[serde(default)]
    pub results: Vec<GeocodedPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodedPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

/// HTTP client for the Open-Meteo forecast, marine and geocoding APIs.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: SourcesConfig,
}

impl OpenMeteoClient {
    /// Create a client for the configured endpoints
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the TLS backend cannot be initialized.
    pub fn new(config: SourcesConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourcesConfig {
        &self.config
    }

    /// Fetch current air conditions and the daily temperature range.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_air(&self, latitude: f64, longitude: f64) -> Result<AirPayload, SourceError> {
        let url = endpoint(&self.config.forecast_url, "forecast");
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", AIR_CURRENT.to_string()),
            ("daily", AIR_DAILY.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", self.config.forecast_days.clamp(1, 7).to_string()),
        ];
        self.get_json(SourceKind::Air, &url, &query).await
    }

    /// Fetch current and hourly sea-surface temperature and waves.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_marine(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MarinePayload, SourceError> {
        let url = endpoint(&self.config.marine_url, "marine");
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", MARINE_CURRENT.to_string()),
            ("hourly", MARINE_HOURLY.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(SourceKind::Marine, &url, &query).await
    }

    /// Fetch the hourly tide-height series starting today.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_tide_series(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<TidePayload, SourceError> {
        let url = endpoint(&self.config.marine_url, "marine");
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", TIDE_HOURLY.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(SourceKind::Tide, &url, &query).await
    }

    /// Look up places matching a free-text name.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, name: &str, count: usize) -> Result<GeocodingPayload, SourceError> {
        let url = endpoint(&self.config.geocoding_url, "search");
        let query = [
            ("name", name.to_string()),
            ("count", count.to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        self.get_json(SourceKind::Geocoding, &url, &query).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        kind: SourceKind,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|error| SourceError::Http { kind, error })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        debug!(%kind, %status, "source responded");
        response
            .json::<T>()
            .await
            .map_err(|error| SourceError::Decode { kind, error })
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
