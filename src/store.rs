//! In-memory location store.
//!
//! The store is a plain owned value: whoever holds it is the only writer, and
//! every mutation goes through `&mut self`. Nothing is persisted; the list
//! lives as long as the process.

use crate::{Location, LocationDraft};
use chrono::Utc;
use tracing::info;

/// Two locations closer than this in both latitude and longitude (degrees)
/// are the same beach. Roughly 100 m at mid-latitudes.
pub const COORDINATE_TOLERANCE: f64 = 0.001;

/// Webcam page shown for a location that did not supply its own.
pub fn default_webcam_url(latitude: f64, longitude: f64) -> String {
    format!("https://www.windy.com/-Webcams/webcams?{latitude:.3},{longitude:.3},11")
}

#[derive(Debug, Default)]
pub struct LocationStore {
    locations: Vec<Location>,
    next_seq: u64,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the two Lisbon-area beaches shown on first launch.
    pub fn with_defaults() -> Self {
        Self {
            locations: vec![
                Location {
                    id: "pt-caparica".to_string(),
                    name: "Costa da Caparica".to_string(),
                    latitude: 38.6413,
                    longitude: -9.2386,
                    country: "Portugal".to_string(),
                    region: Some("Setúbal".to_string()),
                    is_favorite: true,
                    webcam_url: None,
                },
                Location {
                    id: "pt-guincho".to_string(),
                    name: "Praia do Guincho".to_string(),
                    latitude: 38.7329,
                    longitude: -9.4730,
                    country: "Portugal".to_string(),
                    region: Some("Lisboa".to_string()),
                    is_favorite: false,
                    webcam_url: None,
                },
            ],
            next_seq: 0,
        }
    }

    /// All locations in insertion order.
    pub fn list(&self) -> Vec<Location> {
        self.locations.clone()
    }

    pub fn get(&self, id: &str) -> Option<Location> {
        self.locations.iter().find(|l| l.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Add a location, or return the existing one it duplicates.
    ///
    /// A draft duplicates an existing record when the names match ignoring
    /// case, or when both coordinates lie within [`COORDINATE_TOLERANCE`].
    /// A duplicate gains a webcam URL only if it had none.
    pub fn add(&mut self, draft: LocationDraft) -> Location {
        let webcam_url = draft
            .webcam_url
            .clone()
            .unwrap_or_else(|| default_webcam_url(draft.latitude, draft.longitude));

        if let Some(existing) = self.locations.iter_mut().find(|l| is_duplicate(l, &draft)) {
            if existing.webcam_url.is_none() {
                existing.webcam_url = Some(webcam_url);
            }
            info!(id = %existing.id, name = %existing.name, "location already tracked");
            return existing.clone();
        }

        let id = self.fresh_id();
        let location = LocationDraft {
            webcam_url: Some(webcam_url),
            ..draft
        }
        .into_location(id);

        info!(id = %location.id, name = %location.name, "location added");
        self.locations.push(location.clone());
        location
    }

    /// Remove a location; returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.locations.len();
        self.locations.retain(|l| l.id != id);
        let removed = self.locations.len() != before;
        if removed {
            info!(%id, "location removed");
        }
        removed
    }

    /// Flip the favorite flag; returns the new value, or `None` if absent.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let location = self.locations.iter_mut().find(|l| l.id == id)?;
        location.is_favorite = !location.is_favorite;
        Some(location.is_favorite)
    }

    // Millisecond clock plus a per-store sequence, so ids minted within the
    // same millisecond still differ.
    fn fresh_id(&mut self) -> String {
        self.next_seq += 1;
        format!("{}-{}", Utc::now().timestamp_millis(), self.next_seq)
    }
}

fn is_duplicate(existing: &Location, draft: &LocationDraft) -> bool {
    existing.name.to_lowercase() == draft.name.to_lowercase()
        || ((existing.latitude - draft.latitude).abs() < COORDINATE_TOLERANCE
            && (existing.longitude - draft.longitude).abs() < COORDINATE_TOLERANCE)
}
