//! Tracking of the currently selected location.
//!
//! Weather requests are never cancelled. Instead every selection bumps a
//! generation counter, each request carries the generation it was issued
//! under, and a response whose generation is no longer current is dropped.

use parking_lot::Mutex;

/// Issued when a selection starts; compared against the tracker on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    location_id: String,
}

impl SelectionTicket {
    pub fn location_id(&self) -> &str {
        &self.location_id
    }
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    location_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    current: Mutex<Current>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `location_id` the current selection, superseding any earlier one.
    pub fn begin(&self, location_id: &str) -> SelectionTicket {
        let mut current = self.current.lock();
        current.generation += 1;
        current.location_id = Some(location_id.to_string());
        SelectionTicket {
            generation: current.generation,
            location_id: location_id.to_string(),
        }
    }

    /// Whether `ticket` still names the current selection.
    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        let current = self.current.lock();
        current.generation == ticket.generation
            && current.location_id.as_deref() == Some(ticket.location_id.as_str())
    }

    pub fn selected(&self) -> Option<String> {
        self.current.lock().location_id.clone()
    }

    /// Drop the selection if it points at `location_id`. Tickets issued for
    /// it stop being current.
    pub fn clear_if(&self, location_id: &str) -> bool {
        let mut current = self.current.lock();
        if current.location_id.as_deref() != Some(location_id) {
            return false;
        }
        current.generation += 1;
        current.location_id = None;
        true
    }
}
