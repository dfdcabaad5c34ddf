//! Front-end facing service.
//!
//! [`BeachService`] owns the location store and the clients, and is the only
//! thing a presentation layer talks to. Store mutations take `&mut self`, so
//! there is exactly one writer; fetches take `&self` and may overlap.

use crate::aggregator::WeatherAggregator;
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::search::{PlaceSearch, SearchResult};
use crate::selection::SelectionTracker;
use crate::sources::{OpenMeteoClient, SourceError};
use crate::store::LocationStore;
use crate::{Location, LocationDraft, WeatherBundle};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ServiceError {
    #[error("no location with id {0:?}")]
    LocationNotFound(String),
}

#[derive(Debug)]
pub struct BeachService {
    store: LocationStore,
    aggregator: WeatherAggregator,
    search: PlaceSearch,
    selection: SelectionTracker,
    debouncer: Debouncer,
}

impl BeachService {
    /// Service over the default two-beach store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        Self::with_store(config, LocationStore::with_defaults())
    }

    /// Service over a caller-supplied store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_store(config: &Config, store: LocationStore) -> Result<Self, SourceError> {
        let client = OpenMeteoClient::new(config.sources.clone())?;
        Ok(Self {
            store,
            aggregator: WeatherAggregator::new(client.clone()),
            search: PlaceSearch::new(client, config.search.max_results),
            selection: SelectionTracker::new(),
            debouncer: Debouncer::new(config.search.debounce()),
        })
    }

    pub fn locations(&self) -> Vec<Location> {
        self.store.list()
    }

    pub fn location(&self, id: &str) -> Option<Location> {
        self.store.get(id)
    }

    pub fn add_location(&mut self, draft: LocationDraft) -> Location {
        self.store.add(draft)
    }

    /// Remove a location, clearing the selection if it pointed there.
    pub fn remove_location(&mut self, id: &str) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.selection.clear_if(id);
        }
        removed
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        self.store.toggle_favorite(id)
    }

    /// Fetch conditions for the location with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::LocationNotFound`] if no such location exists.
    /// Source failures never surface here; they degrade the bundle instead.
    pub async fn weather(&self, id: &str) -> Result<WeatherBundle, ServiceError> {
        let location = self
            .store
            .get(id)
            .ok_or_else(|| ServiceError::LocationNotFound(id.to_string()))?;
        Ok(self.aggregator.bundle(&location).await)
    }

    /// Select a location and fetch its conditions.
    ///
    /// Resolves to `Ok(None)` when another selection was made while this one
    /// was in flight; the late bundle is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::LocationNotFound`] if no such location exists.
    pub async fn select(&self, id: &str) -> Result<Option<WeatherBundle>, ServiceError> {
        let location = self
            .store
            .get(id)
            .ok_or_else(|| ServiceError::LocationNotFound(id.to_string()))?;
        let ticket = self.selection.begin(id);

        let bundle = self.aggregator.bundle(&location).await;

        if self.selection.is_current(&ticket) {
            Ok(Some(bundle))
        } else {
            debug!(id = ticket.location_id(), "discarding superseded weather response");
            Ok(None)
        }
    }

    pub fn selected(&self) -> Option<String> {
        self.selection.selected()
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search.search(query).await
    }

    /// Search once `query` has been left unchanged for the debounce interval.
    ///
    /// Resolves to `None` when a newer query arrived during the wait.
    pub async fn search_debounced(&self, query: &str) -> Option<Vec<SearchResult>> {
        let query = self.debouncer.settle(query).await?;
        Some(self.search.search(query).await)
    }
}
