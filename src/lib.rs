//! # Beach Conditions Core Library
//!
//! Data model and services for tracking weather, sea-surface and tide
//! conditions across a short, user-curated list of beaches.
//!
//! ## Data Flow
//!
//! 1. **Store**: [`store::LocationStore`] owns the beach list and hands out
//!    coordinates
//! 2. **Fetch**: [`sources::OpenMeteoClient`] calls the air, marine and tide
//!    endpoints independently
//! 3. **Normalize**: [`normalize`] maps each raw payload onto the snapshot
//!    types below, marking absent values as [`Reading::Unknown`]
//! 4. **Derive**: [`tide`] scans the hourly tide series for the current trend
//!    and the next turning points
//! 5. **Aggregate**: [`aggregator::WeatherAggregator`] merges everything into
//!    one immutable [`WeatherBundle`]
//!
//! ## Missing Data
//!
//! Third-party sources frequently omit fields or fail outright. Nothing in
//! this crate substitutes zero for a missing number: an absent measurement is
//! a [`Reading::Unknown`], an absent wave field is `None`, and an unavailable
//! tide series produces [`TideState::unknown`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Module declarations
pub mod aggregator;
pub mod config;
pub mod debounce;
pub mod fallback;
pub mod normalize;
pub mod renderer;
pub mod search;
pub mod selection;
pub mod service;
pub mod sources;
pub mod store;
pub mod tide;

/// A numeric measurement that may be unavailable.
///
/// Serialized as a plain JSON number, or `null` when unknown. Non-finite
/// inputs are treated as unknown.
///
/// # Example
/// ```
/// use beach_conditions::Reading;
///
/// let zero = Reading::from(Some(0.0));
/// assert_eq!(zero.value(), Some(0.0));
///
/// let missing = Reading::from(None);
/// assert!(!missing.is_known());
/// assert_eq!(missing.to_string(), "—");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Reading {
    Known(f64),
    #[default]
    Unknown,
}

impl Reading {
    /// Placeholder rendered in place of an unknown value.
    pub const PLACEHOLDER: &'static str = "—";

    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Known(v) => Some(v),
            Reading::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Reading::Known(_))
    }

}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Reading::Known(v),
            _ => Reading::Unknown,
        }
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::from(Some(value))
    }
}

impl From<Reading> for Option<f64> {
    fn from(reading: Reading) -> Self {
        reading.value()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, f.precision()) {
            (Reading::Known(v), Some(p)) => write!(f, "{v:.p$}"),
            (Reading::Known(v), None) => write!(f, "{v}"),
            (Reading::Unknown, _) => f.write_str(Self::PLACEHOLDER),
        }
    }
}

/// A beach the user is tracking.
///
/// The `id` is assigned by [`store::LocationStore::add`] and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Degrees north, not validated
    pub latitude: f64,
    /// Degrees east, not validated
    pub longitude: f64,
    pub country: String,
    /// State, province or other first-level administrative region
    pub region: Option<String>,
    pub is_favorite: bool,
    pub webcam_url: Option<String>,
}

/// Everything needed to create a [`Location`] except its id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub region: Option<String>,
    pub is_favorite: bool,
    pub webcam_url: Option<String>,
}

impl LocationDraft {
    pub(crate) fn into_location(self, id: String) -> Location {
        Location {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country,
            region: self.region,
            is_favorite: self.is_favorite,
            webcam_url: self.webcam_url,
        }
    }
}

/// Air conditions at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature, °C
    pub temperature: Reading,
    /// Apparent temperature, °C
    pub feels_like: Reading,
    /// Relative humidity, %
    pub humidity: Reading,
    /// Wind speed, km/h
    pub wind_speed: Reading,
    /// Direction the wind blows from, degrees (0–360)
    pub wind_direction: Reading,
    pub description: String,
    pub icon: String,
}

/// Sea conditions at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterSnapshot {
    /// Sea-surface temperature, °C
    pub temperature: Reading,
    /// Significant wave height, metres; `None` when the source has no wave data
    pub wave_height: Option<f64>,
    /// Direction waves come from, degrees
    pub wave_direction: Option<f64>,
}

/// Tide classification at the queried instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
    Rising,
    Falling,
}

/// Turning point of the tide curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideExtreme {
    High,
    Low,
}

impl From<TideExtreme> for TideKind {
    fn from(extreme: TideExtreme) -> Self {
        match extreme {
            TideExtreme::High => TideKind::High,
            TideExtreme::Low => TideKind::Low,
        }
    }
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TideKind::High => "high",
            TideKind::Low => "low",
            TideKind::Rising => "rising",
            TideKind::Falling => "falling",
        })
    }
}

impl fmt::Display for TideExtreme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TideKind::from(*self).fmt(f)
    }
}

/// The tide reading at the queried hour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideReading {
    /// Metres
    pub height: Reading,
    pub kind: TideKind,
    /// Local wall-clock time, `HH:MM`; empty when unknown
    pub time: String,
}

/// An upcoming high or low tide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    pub kind: TideExtreme,
    /// Metres
    pub height: f64,
    /// Local wall-clock time, `HH:MM`
    pub time: String,
}

/// Current tide plus the next turning points: the next high, if any, then
/// the next low, if any.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideState {
    pub current: TideReading,
    pub upcoming: Vec<TideEvent>,
}

/// One calendar day of the multi-day forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub weather: WeatherSnapshot,
    pub water: WaterSnapshot,
    pub tide: TideState,
    pub high: Reading,
    pub low: Reading,
}

/// Weather, water and tide right now.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub weather: WeatherSnapshot,
    pub water: WaterSnapshot,
    pub tide: TideState,
}

/// Everything the presentation layer shows for one beach.
///
/// Built once per fetch and never mutated afterwards; a refresh produces a
/// new bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherBundle {
    pub location: Location,
    pub current: CurrentConditions,
    /// At most seven days, ascending, starting today. Empty when either the
    /// air or the marine source failed.
    pub forecast: Vec<ForecastDay>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_serializes_as_number_or_null() {
        let known = serde_json::to_string(&Reading::Known(1.5)).unwrap();
        let unknown = serde_json::to_string(&Reading::Unknown).unwrap();
        assert_eq!(known, "1.5");
        assert_eq!(unknown, "null");

        let back: Reading = serde_json::from_str("null").unwrap();
        assert_eq!(back, Reading::Unknown);
    }

    #[test]
    fn reading_treats_nan_as_unknown() {
        assert_eq!(Reading::from(f64::NAN), Reading::Unknown);
        assert_eq!(Reading::from(0.0), Reading::Known(0.0));
    }

    #[test]
    fn reading_display_honours_precision() {
        assert_eq!(format!("{:.1}", Reading::Known(21.456)), "21.5");
        assert_eq!(format!("{:.1}", Reading::Unknown), "—");
    }

    #[test]
    fn tide_kinds_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&TideKind::Rising).unwrap(), "\"rising\"");
        assert_eq!(serde_json::to_string(&TideExtreme::Low).unwrap(), "\"low\"");
        assert_eq!(TideKind::from(TideExtreme::High), TideKind::High);
    }
}
