//! # Weather Aggregation
//!
//! Fans out to the three data sources for one location and merges whatever
//! comes back into a [`WeatherBundle`].
//!
//! ## Failure Policy
//!
//! | Source fails | Effect                                                 |
//! |--------------|--------------------------------------------------------|
//! | air          | current weather is all unknown, description `N/A`      |
//! | marine       | current water is unknown, no wave data                 |
//! | air or marine| forecast is empty (it needs both)                      |
//! | tide         | current and per-day tide states are unknown            |
//!
//! Current conditions degrade field by field while the forecast is all or
//! nothing. No source is retried.

use crate::normalize::{
    forecast_from_daily, unavailable_water, unavailable_weather, water_from_marine, weather_from_air,
};
use crate::sources::{OpenMeteoClient, SourceError, TidePayload};
use crate::tide::{self, TideSeries};
use crate::{CurrentConditions, Location, TideState, WeatherBundle};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    client: OpenMeteoClient,
    forecast_days: usize,
}

impl WeatherAggregator {
    pub fn new(client: OpenMeteoClient) -> Self {
        let forecast_days = usize::from(client.config().forecast_days);
        Self {
            client,
            forecast_days,
        }
    }

    /// Fetch and assemble conditions for `location` as of now.
    pub async fn bundle(&self, location: &Location) -> WeatherBundle {
        self.bundle_at(location, Utc::now()).await
    }

    /// Fetch and assemble conditions for `location`, treating `now` as the
    /// current instant when locating the tide sample.
    #[instrument(skip(self, location), fields(id = %location.id), level = "info")]
    pub async fn bundle_at(&self, location: &Location, now: DateTime<Utc>) -> WeatherBundle {
        let (lat, lon) = (location.latitude, location.longitude);
        let (air, marine, tide) = tokio::join!(
            self.client.fetch_air(lat, lon),
            self.client.fetch_marine(lat, lon),
            self.client.fetch_tide_series(lat, lon),
        );

        let weather = match &air {
            Ok(payload) => weather_from_air(payload),
            Err(e) => {
                warn!("air conditions unavailable: {e}");
                unavailable_weather()
            }
        };
        let water = match &marine {
            Ok(payload) => water_from_marine(payload),
            Err(e) => {
                warn!("marine conditions unavailable: {e}");
                unavailable_water()
            }
        };

        let (series, hour_key) = tide_series(tide, now);
        let current_tide = series
            .as_ref()
            .map(|s| tide::derive(s, &hour_key))
            .unwrap_or_else(TideState::unknown);

        let mut forecast = match (&air, &marine) {
            (Ok(air), Ok(marine)) => forecast_from_daily(air, marine, self.forecast_days),
            _ => Vec::new(),
        };
        if let Some(series) = &series {
            for day in &mut forecast {
                day.tide = tide::derive_for_date(series, day.date, &hour_key);
            }
        }

        info!(
            forecast_days = forecast.len(),
            tide_known = !current_tide.is_unknown(),
            "conditions assembled"
        );

        WeatherBundle {
            location: location.clone(),
            current: CurrentConditions {
                weather,
                water,
                tide: current_tide,
            },
            forecast,
            fetched_at: now,
        }
    }
}

/// Validated tide series plus the local hour key, or `None` when the fetch
/// failed or the series is malformed.
fn tide_series(
    fetched: Result<TidePayload, SourceError>,
    now: DateTime<Utc>,
) -> (Option<TideSeries>, String) {
    let payload = match fetched {
        Ok(payload) => payload,
        Err(e) => {
            warn!("tide series unavailable: {e}");
            return (None, tide::hour_key(now, 0));
        }
    };

    let hour_key = tide::hour_key(now, payload.utc_offset_seconds.unwrap_or(0));
    let hourly = payload.hourly.unwrap_or_default();
    match TideSeries::new(hourly.time, hourly.tide_height) {
        Ok(series) => (Some(series), hour_key),
        Err(e) => {
            debug!("tide series unusable: {e}");
            (None, hour_key)
        }
    }
}
