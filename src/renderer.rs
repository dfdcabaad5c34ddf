//! # Text Rendering
//!
//! Renders locations, search results and weather bundles as plain-text
//! panels for terminal output. Unknown values print as `—`; an air source
//! that failed outright shows `N/A` in its description line. Nothing here
//! blocks on missing data: a bundle with every source down still renders the
//! location header and empty panels.

use crate::search::SearchResult;
use crate::{ForecastDay, Location, Reading, TideState, WaterSnapshot, WeatherBundle, WeatherSnapshot};
use std::fmt::Write;

const RULE_WIDTH: usize = 44;

/// One line per location, favorites starred.
pub fn render_locations(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "No locations tracked.\n".to_string();
    }

    let mut out = String::new();
    for location in locations {
        let star = if location.is_favorite { '★' } else { ' ' };
        let _ = writeln!(
            out,
            "{star} {:<20} {}  ({:.4}, {:.4})",
            location.id,
            place_line(location),
            location.latitude,
            location.longitude
        );
    }
    out
}

/// Numbered search results.
pub fn render_search(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No matching places.\n".to_string();
    }

    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  ({:.4}, {:.4})",
            i + 1,
            result.display_name,
            result.latitude,
            result.longitude
        );
    }
    out
}

/// Current-conditions panel, optionally followed by the forecast table.
pub fn render_bundle(bundle: &WeatherBundle, show_forecast: bool) -> String {
    let mut out = String::new();
    let location = &bundle.location;

    let _ = writeln!(out, "{}", location.name);
    let _ = writeln!(out, "{}", place_line(location));
    if let Some(url) = &location.webcam_url {
        let _ = writeln!(out, "Webcam: {url}");
    }
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));

    render_weather(&mut out, &bundle.current.weather);
    render_water(&mut out, &bundle.current.water);
    render_tide(&mut out, &bundle.current.tide);

    if show_forecast {
        let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));
        render_forecast(&mut out, &bundle.forecast);
    }
    out
}

fn place_line(location: &Location) -> String {
    match &location.region {
        Some(region) => format!("{}, {}", region, location.country),
        None => location.country.clone(),
    }
}

fn render_weather(out: &mut String, weather: &WeatherSnapshot) {
    let _ = writeln!(
        out,
        "Air      {}°C (feels {}°C)  {}",
        fmt1(weather.temperature),
        fmt1(weather.feels_like),
        weather.description
    );
    let _ = writeln!(
        out,
        "Wind     {} km/h from {}  Humidity {}%",
        fmt1(weather.wind_speed),
        compass(weather.wind_direction),
        fmt0(weather.humidity)
    );
}

fn render_water(out: &mut String, water: &WaterSnapshot) {
    let waves = match (water.wave_height, water.wave_direction) {
        (Some(h), Some(d)) => format!("{h:.1} m from {}", compass(Reading::Known(d))),
        (Some(h), None) => format!("{h:.1} m"),
        _ => "no wave data".to_string(),
    };
    let _ = writeln!(out, "Water    {}°C  Waves {waves}", fmt1(water.temperature));
}

fn render_tide(out: &mut String, tide: &TideState) {
    if tide.is_unknown() {
        let _ = writeln!(out, "Tide     {}", Reading::PLACEHOLDER);
        return;
    }
    let _ = writeln!(
        out,
        "Tide     {} m {} at {}",
        fmt2(tide.current.height),
        tide.current.kind,
        tide.current.time
    );
    for event in &tide.upcoming {
        let _ = writeln!(out, "         next {:<4} {:.2} m at {}", event.kind, event.height, event.time);
    }
}

fn render_forecast(out: &mut String, forecast: &[ForecastDay]) {
    if forecast.is_empty() {
        let _ = writeln!(out, "Forecast unavailable");
        return;
    }

    let _ = writeln!(out, "{:<10}  {:>6}  {:>6}  {:>6}  {:>5}", "Date", "High", "Low", "Water", "Waves");
    for day in forecast {
        let waves = day
            .water
            .wave_height
            .map(|h| format!("{h:.1}"))
            .unwrap_or_else(|| Reading::PLACEHOLDER.to_string());
        let _ = writeln!(
            out,
            "{:<10}  {:>6}  {:>6}  {:>6}  {:>5}",
            day.date.format("%a %d %b").to_string(),
            fmt1(day.high),
            fmt1(day.low),
            fmt1(day.water.temperature),
            waves
        );
    }
}

fn fmt0(reading: Reading) -> String {
    format!("{reading:.0}")
}

fn fmt1(reading: Reading) -> String {
    format!("{reading:.1}")
}

fn fmt2(reading: Reading) -> String {
    format!("{reading:.2}")
}

/// Sixteen-point compass name for a bearing in degrees.
fn compass(bearing: Reading) -> String {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
    ];
    match bearing.value() {
        Some(deg) => {
            let index = ((deg.rem_euclid(360.0) / 22.5).round() as usize) % POINTS.len();
            POINTS[index].to_string()
        }
        None => Reading::PLACEHOLDER.to_string(),
    }
}
