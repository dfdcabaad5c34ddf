//! # Tide Derivation
//!
//! Turns an hourly tide-height series into the current tide state and the
//! next turning points.
//!
//! ## Algorithm
//!
//! 1. **Locate**: find the sample whose timestamp starts with the current
//!    local hour (`YYYY-MM-DDTHH`); use the first sample when none matches
//! 2. **Trend**: the next sample strictly higher means `rising`, anything
//!    else `falling`. The last sample has no successor and reports `falling`
//! 3. **Scan**: walk forward from the sample after the located one to the
//!    second-to-last sample. A sample above its left neighbour and not below
//!    its right one is a high; the mirror rule marks a low. The first of each
//!    is kept and the scan stops once both are found
//! 4. **Report**: the next high (if any) is listed before the next low (if
//!    any), regardless of which one occurs first
//!
//! Hourly sampling means a turning point can fall between two samples; the
//! reported time and height are those of the nearest sample, not of the true
//! extremum. This is a heuristic over sampled data, not a harmonic model.
//!
//! ## Unavailable Data
//!
//! Tide data is often missing. A series that is empty, has mismatched arrays
//! or contains gaps is rejected by [`TideSeries::new`], and callers map that
//! onto [`TideState::unknown`] instead of propagating an error.

use crate::{Reading, TideEvent, TideExtreme, TideKind, TideReading, TideState};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use thiserror::Error;
use tracing::debug;

/// Reasons a tide series cannot be used.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    #[error("tide series is empty")]
    Empty,

    #[error("tide series has {times} timestamps but {heights} heights")]
    LengthMismatch { times: usize, heights: usize },

    #[error("tide series has no height at sample {0}")]
    MissingSample(usize),
}

/// A validated hourly tide series: non-empty, equal-length, gap-free.
#[derive(Debug, Clone, PartialEq)]
pub struct TideSeries {
    times: Vec<String>,
    heights: Vec<f64>,
}

impl TideSeries {
    /// Validate parallel timestamp and height arrays.
    pub fn new(times: Vec<String>, heights: Vec<Option<f64>>) -> Result<Self, SeriesError> {
        if times.len() != heights.len() {
            return Err(SeriesError::LengthMismatch {
                times: times.len(),
                heights: heights.len(),
            });
        }
        if times.is_empty() {
            return Err(SeriesError::Empty);
        }

        let heights = heights
            .into_iter()
            .enumerate()
            .map(|(i, h)| h.filter(|v| v.is_finite()).ok_or(SeriesError::MissingSample(i)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { times, heights })
    }

    /// Index of the first sample whose timestamp starts with `prefix`.
    pub fn locate(&self, prefix: &str) -> Option<usize> {
        self.times.iter().position(|t| t.starts_with(prefix))
    }
}

impl TideState {
    /// Tide state used whenever no usable series exists.
    pub fn unknown() -> Self {
        TideState {
            current: TideReading {
                height: Reading::Unknown,
                kind: TideKind::Low,
                time: String::new(),
            },
            upcoming: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        !self.current.height.is_known()
    }
}

/// Hour key (`YYYY-MM-DDTHH`) of `now` in a location's local time.
///
/// Open-Meteo timestamps are local when requested with `timezone=auto`, so
/// the key must be built in the same offset. Offsets chrono rejects fall
/// back to UTC.
pub fn hour_key(now: DateTime<Utc>, utc_offset_seconds: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset).format("%Y-%m-%dT%H").to_string()
}

/// Derive the tide state at `hour_key`, falling back to the first sample.
pub fn derive(series: &TideSeries, hour_key: &str) -> TideState {
    let index = series.locate(hour_key).unwrap_or(0);
    derive_at(series, index)
}

/// Validate raw arrays and derive, mapping any validation failure to
/// [`TideState::unknown`].
pub fn derive_or_unknown(
    times: Vec<String>,
    heights: Vec<Option<f64>>,
    hour_key: &str,
) -> TideState {
    match TideSeries::new(times, heights) {
        Ok(series) => derive(&series, hour_key),
        Err(e) => {
            debug!("tide series unusable: {e}");
            TideState::unknown()
        }
    }
}

/// Tide state for one forecast day.
///
/// Today is anchored at the current hour; later days at their first sample.
/// A date the series does not cover is unknown rather than borrowing the
/// first sample of some other day.
pub fn derive_for_date(series: &TideSeries, date: NaiveDate, hour_key: &str) -> TideState {
    let day = date.format("%Y-%m-%d").to_string();
    let anchor = if hour_key.starts_with(&day) {
        series.locate(hour_key).or_else(|| series.locate(&day))
    } else {
        series.locate(&day)
    };

    match anchor {
        Some(index) => derive_at(series, index),
        None => TideState::unknown(),
    }
}

fn derive_at(series: &TideSeries, index: usize) -> TideState {
    let heights = &series.heights;
    let last = heights.len() - 1;
    let current = heights[index];

    // No successor at the last sample; reported as falling.
    let kind = match heights.get(index + 1) {
        Some(&next) if next > current => TideKind::Rising,
        _ => TideKind::Falling,
    };

    let mut next_high = None;
    let mut next_low = None;
    for i in (index + 1)..last {
        let (prev, here, next) = (heights[i - 1], heights[i], heights[i + 1]);
        if next_high.is_none() && here > prev && here >= next {
            next_high = Some(i);
        }
        if next_low.is_none() && here < prev && here <= next {
            next_low = Some(i);
        }
        if next_high.is_some() && next_low.is_some() {
            break;
        }
    }

    // High first, then low, whichever comes sooner.
    let upcoming = next_high
        .map(|i| (i, TideExtreme::High))
        .into_iter()
        .chain(next_low.map(|i| (i, TideExtreme::Low)))
        .map(|(i, kind)| TideEvent {
            kind,
            height: round_cm(heights[i]),
            time: clock_time(&series.times[i]),
        })
        .collect();

    TideState {
        current: TideReading {
            height: Reading::Known(round_cm(current)),
            kind,
            time: clock_time(&series.times[index]),
        },
        upcoming,
    }
}

fn round_cm(metres: f64) -> f64 {
    (metres * 100.0).round() / 100.0
}

/// `HH:MM` portion of an ISO-8601 local timestamp.
fn clock_time(timestamp: &str) -> String {
    timestamp.get(11..16).unwrap_or(timestamp).to_string()
}
