//! Integration tests against a mock Open-Meteo server
//!
//! These tests drive the aggregator, search and service layers through real
//! HTTP requests, checking how each degrades when a source fails.

use beach_conditions::aggregator::WeatherAggregator;
use beach_conditions::config::{Config, SourcesConfig};
use beach_conditions::search::PlaceSearch;
use beach_conditions::service::{BeachService, ServiceError};
use beach_conditions::sources::OpenMeteoClient;
use beach_conditions::store::LocationStore;
use beach_conditions::{Location, Reading, TideExtreme, TideKind};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const MARINE_HOURLY: &str = "sea_surface_temperature,wave_height,wave_direction";

fn sample_air_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 38.73,
        "longitude": -9.47,
        "utc_offset_seconds": 3600,
        "timezone": "Europe/Lisbon",
        "current": {
            "time": "2025-07-01T01:30",
            "temperature_2m": 21.4,
            "apparent_temperature": 22.0,
            "relative_humidity_2m": 65,
            "wind_speed_10m": 14.2,
            "wind_direction_10m": 310
        },
        "daily": {
            "time": ["2025-07-01", "2025-07-02", "2025-07-03"],
            "temperature_2m_max": [25.0, 26.5, 24.0],
            "temperature_2m_min": [17.0, 18.0, 16.5],
            "apparent_temperature_max": [26.0, 27.0, null]
        }
    })
}

fn sample_marine_response() -> serde_json::Value {
    serde_json::json!({
        "utc_offset_seconds": 3600,
        "current": {
            "time": "2025-07-01T01:30",
            "sea_surface_temperature": 18.3,
            "wave_height": 1.2,
            "wave_direction": 290
        },
        "hourly": {
            "time": ["2025-07-01T00:00", "2025-07-01T01:00", "2025-07-01T02:00"],
            "sea_surface_temperature": [18.0, 18.1, null],
            "wave_height": [1.1, 1.2, 1.3],
            "wave_direction": [280, 285, 290]
        }
    })
}

/// Seven hours of the first day followed by three of the second.
fn sample_tide_response() -> serde_json::Value {
    let mut times: Vec<String> = (0..7).map(|h| format!("2025-07-01T{h:02}:00")).collect();
    times.extend((0..3).map(|h| format!("2025-07-02T{h:02}:00")));
    serde_json::json!({
        "utc_offset_seconds": 3600,
        "hourly": {
            "time": times,
            "tide_height": [1.0, 1.5, 2.0, 1.6, 1.0, 0.6, 0.9, 1.2, 0.8, 1.1]
        }
    })
}

fn sample_geocoding_response(count: usize) -> serde_json::Value {
    let results: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": 2_735_000 + i,
                "name": format!("Nazare {i}"),
                "latitude": 39.6 + i as f64 * 0.01,
                "longitude": -9.07,
                "country": "Portugal",
                "admin1": "Leiria"
            })
        })
        .collect();
    serde_json::json!({ "results": results, "generationtime_ms": 0.4 })
}

/// 00:30 UTC is 01:30 at the +01:00 offset the samples use.
fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 0, 30, 0).unwrap()
}

fn test_sources(mock_server: &MockServer) -> SourcesConfig {
    SourcesConfig {
        forecast_url: mock_server.uri(),
        marine_url: mock_server.uri(),
        geocoding_url: mock_server.uri(),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn test_config(mock_server: &MockServer) -> Config {
    Config {
        sources: test_sources(mock_server),
        ..Default::default()
    }
}

fn create_test_client(mock_server: &MockServer) -> OpenMeteoClient {
    OpenMeteoClient::new(test_sources(mock_server)).expect("Failed to create client")
}

fn guincho() -> Location {
    LocationStore::with_defaults()
        .get("pt-guincho")
        .expect("default store has Guincho")
}

async fn setup_air_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

async fn setup_marine_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/marine"))
        .and(query_param("hourly", MARINE_HOURLY))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

async fn setup_tide_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/marine"))
        .and(query_param("hourly", "tide_height"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

async fn setup_all_sources(mock_server: &MockServer) {
    setup_air_mock(mock_server, ResponseTemplate::new(200).set_body_json(sample_air_response())).await;
    setup_marine_mock(mock_server, ResponseTemplate::new(200).set_body_json(sample_marine_response())).await;
    setup_tide_mock(mock_server, ResponseTemplate::new(200).set_body_json(sample_tide_response())).await;
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_bundle_with_all_sources() {
    let mock_server = MockServer::start().await;
    setup_all_sources(&mock_server).await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    assert_eq!(bundle.location.id, "pt-guincho");
    assert_eq!(bundle.fetched_at, test_now());

    let weather = &bundle.current.weather;
    assert_eq!(weather.temperature, Reading::Known(21.4));
    assert_eq!(weather.feels_like, Reading::Known(22.0));
    assert_eq!(weather.humidity, Reading::Known(65.0));
    assert_eq!(weather.wind_direction, Reading::Known(310.0));

    let water = &bundle.current.water;
    assert_eq!(water.temperature, Reading::Known(18.3));
    assert_eq!(water.wave_height, Some(1.2));
    assert_eq!(water.wave_direction, Some(290.0));

    let tide = &bundle.current.tide;
    assert_eq!(tide.current.height, Reading::Known(1.5));
    assert_eq!(tide.current.kind, TideKind::Rising);
    assert_eq!(tide.current.time, "01:00");
    assert_eq!(tide.upcoming.len(), 2);
    assert_eq!(tide.upcoming[0].kind, TideExtreme::High);
    assert_eq!(tide.upcoming[0].time, "02:00");
    assert_eq!(tide.upcoming[1].kind, TideExtreme::Low);
    assert!((tide.upcoming[1].height - 0.6).abs() < 1e-9);
    assert_eq!(tide.upcoming[1].time, "05:00");
}

#[tokio::test]
async fn test_forecast_days_carry_daily_values_and_tides() {
    let mock_server = MockServer::start().await;
    setup_all_sources(&mock_server).await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    let forecast = &bundle.forecast;
    assert_eq!(forecast.len(), 3);
    assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    assert_eq!(forecast[1].high, Reading::Known(26.5));
    assert_eq!(forecast[1].low, Reading::Known(18.0));
    assert_eq!(forecast[2].weather.feels_like, Reading::Unknown);

    // Water for day i comes from hourly slot i, else the current value.
    assert_eq!(forecast[0].water.temperature, Reading::Known(18.0));
    assert_eq!(forecast[2].water.temperature, Reading::Known(18.3));

    // Today matches the current tide; tomorrow starts at its first sample.
    assert_eq!(forecast[0].tide, bundle.current.tide);
    let tomorrow = &forecast[1].tide;
    assert_eq!(tomorrow.current.height, Reading::Known(1.2));
    assert_eq!(tomorrow.current.kind, TideKind::Falling);
    assert_eq!(tomorrow.upcoming.len(), 1);
    assert_eq!(tomorrow.upcoming[0].kind, TideExtreme::Low);
    assert_eq!(tomorrow.upcoming[0].time, "01:00");

    // The series does not reach the third day.
    assert!(forecast[2].tide.is_unknown());
}

#[tokio::test]
async fn test_air_failure_degrades_weather_and_drops_forecast() {
    let mock_server = MockServer::start().await;
    setup_air_mock(&mock_server, ResponseTemplate::new(500).set_body_string("Internal Server Error")).await;
    setup_marine_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_marine_response())).await;
    setup_tide_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_tide_response())).await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    let weather = &bundle.current.weather;
    assert_eq!(weather.description, "N/A");
    assert_eq!(weather.temperature, Reading::Unknown);
    assert_eq!(weather.humidity, Reading::Unknown);

    assert_eq!(bundle.current.water.temperature, Reading::Known(18.3));
    assert!(!bundle.current.tide.is_unknown());
    assert!(bundle.forecast.is_empty());
}

#[tokio::test]
async fn test_marine_failure_keeps_weather_and_drops_forecast() {
    let mock_server = MockServer::start().await;
    setup_air_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_air_response())).await;
    setup_marine_mock(&mock_server, ResponseTemplate::new(503)).await;
    setup_tide_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_tide_response())).await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    assert_eq!(bundle.current.weather.temperature, Reading::Known(21.4));
    assert_eq!(bundle.current.water.temperature, Reading::Unknown);
    assert_eq!(bundle.current.water.wave_height, None);
    assert!(bundle.forecast.is_empty());
}

#[tokio::test]
async fn test_tide_failure_yields_unknown_tide() {
    let mock_server = MockServer::start().await;
    setup_air_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_air_response())).await;
    setup_marine_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_marine_response())).await;
    setup_tide_mock(&mock_server, ResponseTemplate::new(500)).await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    assert!(bundle.current.tide.is_unknown());
    assert_eq!(bundle.current.tide.current.time, "");
    assert!(bundle.current.tide.upcoming.is_empty());
    assert_eq!(bundle.forecast.len(), 3);
    assert!(bundle.forecast.iter().all(|day| day.tide.is_unknown()));
}

#[tokio::test]
async fn test_tide_series_with_gap_yields_unknown_tide() {
    let mock_server = MockServer::start().await;
    setup_air_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_air_response())).await;
    setup_marine_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_marine_response())).await;
    setup_tide_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "utc_offset_seconds": 3600,
            "hourly": {
                "time": ["2025-07-01T00:00", "2025-07-01T01:00", "2025-07-01T02:00"],
                "tide_height": [1.0, null, 2.0]
            }
        })),
    )
    .await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    assert!(bundle.current.tide.is_unknown());
    assert!(bundle.forecast.iter().all(|day| day.tide.is_unknown()));
}

#[tokio::test]
async fn test_undecodable_body_is_treated_as_failure() {
    let mock_server = MockServer::start().await;
    setup_air_mock(&mock_server, ResponseTemplate::new(200).set_body_string("not json")).await;
    setup_marine_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_marine_response())).await;
    setup_tide_mock(&mock_server, ResponseTemplate::new(200).set_body_json(sample_tide_response())).await;

    let aggregator = WeatherAggregator::new(create_test_client(&mock_server));
    let bundle = aggregator.bundle_at(&guincho(), test_now()).await;

    assert_eq!(bundle.current.weather.description, "N/A");
    assert!(bundle.forecast.is_empty());
}

// ============================================================================
// Place search
// ============================================================================

#[tokio::test]
async fn test_search_maps_geocoder_results() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "nazare"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let search = PlaceSearch::new(create_test_client(&mock_server), 10);
    let results = search.search("  nazare ").await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Nazare 0");
    assert_eq!(results[0].display_name, "Nazare 0, Leiria, Portugal");
    assert_eq!(results[0].region.as_deref(), Some("Leiria"));
    assert_eq!(results[0].country, "Portugal");
}

#[tokio::test]
async fn test_search_caps_results() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response(15)))
        .mount(&mock_server)
        .await;

    let search = PlaceSearch::new(create_test_client(&mock_server), 50);
    assert_eq!(search.search("nazare").await.len(), 10);

    let search = PlaceSearch::new(create_test_client(&mock_server), 3);
    assert_eq!(search.search("nazare").await.len(), 3);
}

#[tokio::test]
async fn test_search_falls_back_when_geocoder_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let search = PlaceSearch::new(create_test_client(&mock_server), 10);
    let results = search.search("Tarifa").await;

    assert!(!results.is_empty());
    assert_eq!(results[0].name, "Tarifa");
}

#[tokio::test]
async fn test_search_falls_back_when_geocoder_finds_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generationtime_ms": 0.2 })))
        .mount(&mock_server)
        .await;

    let search = PlaceSearch::new(create_test_client(&mock_server), 10);
    let results = search.search("tarifa").await;

    assert_eq!(results[0].name, "Tarifa");
    assert!(search.search("zzzz-no-such-beach").await.is_empty());
}

#[tokio::test]
async fn test_short_query_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response(1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let search = PlaceSearch::new(create_test_client(&mock_server), 10);
    assert!(search.search("a").await.is_empty());
    assert!(search.search("   t  ").await.is_empty());
    assert!(search.search("").await.is_empty());
}

// ============================================================================
// Service
// ============================================================================

#[tokio::test]
async fn test_weather_for_unknown_location() {
    let mock_server = MockServer::start().await;
    let service = BeachService::new(&test_config(&mock_server)).expect("Failed to create service");

    let result = service.weather("nope").await;

    assert_eq!(result, Err(ServiceError::LocationNotFound("nope".to_string())));
}

#[tokio::test]
async fn test_weather_for_added_location() {
    let mock_server = MockServer::start().await;
    setup_all_sources(&mock_server).await;

    let mut service = BeachService::with_store(&test_config(&mock_server), LocationStore::new())
        .expect("Failed to create service");
    let location = service.add_location(beach_conditions::LocationDraft {
        name: "Praia da Ursa".to_string(),
        latitude: 38.79,
        longitude: -9.49,
        country: "Portugal".to_string(),
        ..Default::default()
    });

    let bundle = service.weather(&location.id).await.expect("location exists");

    assert_eq!(bundle.location, location);
    assert_eq!(bundle.current.weather.temperature, Reading::Known(21.4));
}

#[tokio::test]
async fn test_superseded_selection_is_discarded() {
    let mock_server = MockServer::start().await;
    // Caparica answers slowly; Guincho immediately.
    Mock::given(method("GET"))
        .and(query_param("latitude", "38.6413"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("latitude", "38.7329"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let service = BeachService::new(&test_config(&mock_server)).expect("Failed to create service");

    let (slow, fast) = tokio::join!(service.select("pt-caparica"), service.select("pt-guincho"));

    assert_eq!(slow, Ok(None));
    let fast = fast.expect("location exists").expect("latest selection is kept");
    assert_eq!(fast.location.id, "pt-guincho");
    assert_eq!(service.selected().as_deref(), Some("pt-guincho"));
}

#[tokio::test]
async fn test_removing_selected_location_clears_selection() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let mut service = BeachService::new(&test_config(&mock_server)).expect("Failed to create service");
    let bundle = service.select("pt-caparica").await.expect("location exists");
    assert!(bundle.is_some());
    assert_eq!(service.selected().as_deref(), Some("pt-caparica"));

    assert!(service.remove_location("pt-caparica"));
    assert_eq!(service.selected(), None);
    assert!(!service.remove_location("pt-caparica"));
    assert_eq!(
        service.select("pt-caparica").await,
        Err(ServiceError::LocationNotFound("pt-caparica".to_string()))
    );
}

#[tokio::test]
async fn test_debounced_search_keeps_only_latest_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "tarifa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = BeachService::new(&test_config(&mock_server)).expect("Failed to create service");

    let (first, second) = tokio::join!(service.search_debounced("tar"), service.search_debounced("tarifa"));

    assert_eq!(first, None);
    let results = second.expect("latest query is searched");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Nazare 0");
}
