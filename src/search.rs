//! Free-text place search for the add-location flow.
//!
//! The Open-Meteo geocoder is asked first; if it fails or finds nothing the
//! offline list in [`crate::fallback`] is filtered instead. Queries shorter
//! than [`MIN_QUERY_CHARS`] are answered with an empty list and touch
//! neither.

use crate::fallback;
use crate::sources::{GeocodedPlace, OpenMeteoClient};
use crate::LocationDraft;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Shortest query that is searched at all
pub const MIN_QUERY_CHARS: usize = 2;

/// Upper bound on results from either source
pub const MAX_RESULTS: usize = 10;

/// A candidate place returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    /// `name, region, country` with empty parts omitted
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub region: Option<String>,
}

impl SearchResult {
    /// Draft for adding this place to the store.
    pub fn into_draft(self) -> LocationDraft {
        LocationDraft {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country,
            region: self.region,
            is_favorite: false,
            webcam_url: None,
        }
    }
}

impl From<GeocodedPlace> for SearchResult {
    fn from(place: GeocodedPlace) -> Self {
        let region = place.admin1.filter(|r| !r.is_empty());
        let country = place.country.unwrap_or_default();
        let display_name = [Some(place.name.as_str()), region.as_deref(), Some(country.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        SearchResult {
            name: place.name,
            display_name,
            latitude: place.latitude,
            longitude: place.longitude,
            country,
            region,
        }
    }
}

/// Geocoder with an offline fallback.
#[derive(Debug, Clone)]
pub struct PlaceSearch {
    client: OpenMeteoClient,
    max_results: usize,
}

impl PlaceSearch {
    pub fn new(client: OpenMeteoClient, max_results: usize) -> Self {
        Self {
            client,
            max_results: max_results.clamp(1, MAX_RESULTS),
        }
    }

    /// Search for places matching `query`.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let term = query.trim();
        if term.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.client.geocode(term, self.max_results).await {
            Ok(payload) if !payload.results.is_empty() => {
                return payload
                    .results
                    .into_iter()
                    .take(self.max_results)
                    .map(SearchResult::from)
                    .collect();
            }
            Ok(_) => debug!(query = %term, "geocoder found nothing, using offline list"),
            Err(e) => warn!(query = %term, "geocoding failed, using offline list: {e}"),
        }

        fallback::search(term, self.max_results)
    }
}
