//! Mapping of raw source payloads onto the canonical snapshot types.
//!
//! Pure functions, no I/O. A field the source omitted becomes
//! [`Reading::Unknown`] (or `None` for wave data); nothing is guessed.

use crate::sources::{AirPayload, MarinePayload};
use crate::{ForecastDay, Reading, TideState, WaterSnapshot, WeatherSnapshot};
use chrono::NaiveDate;
use tracing::debug;

/// Longest forecast ever produced
pub const MAX_FORECAST_DAYS: usize = 7;

/// Description shown when the source supplied none
pub const NO_DESCRIPTION: &str = "—";

/// Description shown when the air source failed outright
pub const UNAVAILABLE_DESCRIPTION: &str = "N/A";

/// Icon tag used when no condition is known
pub const UNKNOWN_ICON: &str = "unknown";

/// Current air conditions from an air payload.
pub fn weather_from_air(air: &AirPayload) -> WeatherSnapshot {
    let current = air.current.clone().unwrap_or_default();
    WeatherSnapshot {
        temperature: current.temperature_2m.into(),
        feels_like: current.apparent_temperature.into(),
        humidity: current.relative_humidity_2m.into(),
        wind_speed: current.wind_speed_10m.into(),
        wind_direction: current.wind_direction_10m.into(),
        description: NO_DESCRIPTION.to_string(),
        icon: UNKNOWN_ICON.to_string(),
    }
}

/// Snapshot used in place of a failed air fetch.
pub fn unavailable_weather() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: Reading::Unknown,
        feels_like: Reading::Unknown,
        humidity: Reading::Unknown,
        wind_speed: Reading::Unknown,
        wind_direction: Reading::Unknown,
        description: UNAVAILABLE_DESCRIPTION.to_string(),
        icon: UNKNOWN_ICON.to_string(),
    }
}

/// Current sea conditions, preferring `current` over the first hourly slot.
pub fn water_from_marine(marine: &MarinePayload) -> WaterSnapshot {
    let current = marine.current.as_ref();
    let hourly = marine.hourly.as_ref();

    let first = |series: Option<&Vec<Option<f64>>>| series.and_then(|s| s.first().copied().flatten());

    WaterSnapshot {
        temperature: current
            .and_then(|c| c.sea_surface_temperature)
            .or_else(|| first(hourly.map(|h| &h.sea_surface_temperature)))
            .into(),
        wave_height: current
            .and_then(|c| c.wave_height)
            .or_else(|| first(hourly.map(|h| &h.wave_height))),
        wave_direction: current
            .and_then(|c| c.wave_direction)
            .or_else(|| first(hourly.map(|h| &h.wave_direction))),
    }
}

/// Snapshot used in place of a failed marine fetch.
pub fn unavailable_water() -> WaterSnapshot {
    WaterSnapshot {
        temperature: Reading::Unknown,
        wave_height: None,
        wave_direction: None,
    }
}

/// Build the multi-day forecast from the daily air series and the marine
/// hourly series.
///
/// Neither provider exposes a full per-day breakdown of every field, so two
/// approximations apply:
///
/// - humidity and wind for every day repeat the *current* air values; there is
///   no per-day wind or humidity series behind them
/// - water fields for day *i* come from hourly marine sample *i* (falling back
///   to the current marine value), which is an hourly slot of the first day,
///   not a reading for day *i*
///
/// Tide states are left unknown here; the aggregator fills them in when a tide
/// series is available. Dates that fail to parse are skipped.
pub fn forecast_from_daily(air: &AirPayload, marine: &MarinePayload, max_days: usize) -> Vec<ForecastDay> {
    let Some(daily) = air.daily.as_ref() else {
        return Vec::new();
    };
    let current = air.current.clone().unwrap_or_default();
    let marine_now = marine.current.clone().unwrap_or_default();
    let hourly = marine.hourly.clone().unwrap_or_default();

    daily
        .time
        .iter()
        .take(max_days.min(MAX_FORECAST_DAYS))
        .enumerate()
        .filter_map(|(i, raw_date)| {
            let date = match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    debug!(date = %raw_date, "skipping forecast day: {e}");
                    return None;
                }
            };
            let high = Reading::from(at(&daily.temperature_2m_max, i));
            let low = Reading::from(at(&daily.temperature_2m_min, i));

            let weather = WeatherSnapshot {
                temperature: high,
                feels_like: at(&daily.apparent_temperature_max, i).into(),
                humidity: current.relative_humidity_2m.into(),
                wind_speed: current.wind_speed_10m.into(),
                wind_direction: current.wind_direction_10m.into(),
                description: NO_DESCRIPTION.to_string(),
                icon: UNKNOWN_ICON.to_string(),
            };
            let water = WaterSnapshot {
                temperature: at(&hourly.sea_surface_temperature, i)
                    .or(marine_now.sea_surface_temperature)
                    .into(),
                wave_height: at(&hourly.wave_height, i).or(marine_now.wave_height),
                wave_direction: at(&hourly.wave_direction, i).or(marine_now.wave_direction),
            };

            Some(ForecastDay {
                date,
                weather,
                water,
                tide: TideState::unknown(),
                high,
                low,
            })
        })
        .collect()
}

fn at(series: &[Option<f64>], i: usize) -> Option<f64> {
    series.get(i).copied().flatten()
}
