//! Pending-write buffer for reorder operations.
//!
//! Drag-and-drop reordering is the one high-frequency mutation, so it is not
//! persisted per message. Each itinerary owns a single slot holding the most
//! recent not-yet-flushed reorder; a newer reorder overwrites the slot rather
//! than queuing behind it, because it already supersedes every earlier
//! ordering for the same day.
//!
//! Access follows a read-modify-clear discipline: a drain takes the record
//! out under the map lock before persisting it, so a concurrent overwrite
//! lands in a fresh slot and is never lost.

use itinera_protocol::{DayId, EventOrder, ItineraryId};
use parking_lot::Mutex;
use std::collections::HashMap;

/// The last reorder broadcast to a room but not yet flushed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReorder {
    /// The day whose events were reordered.
    pub day_id: DayId,
    /// The full new ordering.
    pub events: Vec<EventOrder>,
}

/// Per-itinerary slots of unflushed reorders.
#[derive(Debug, Default)]
pub struct PendingWrites {
    slots: Mutex<HashMap<ItineraryId, PendingReorder>>,
}

impl PendingWrites {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reorder for an itinerary, overwriting any unflushed one.
    pub fn record(&self, itinerary_id: ItineraryId, reorder: PendingReorder) {
        self.slots.lock().insert(itinerary_id, reorder);
    }

    /// Takes the pending reorder for an itinerary, clearing its slot.
    pub fn take(&self, itinerary_id: ItineraryId) -> Option<PendingReorder> {
        self.slots.lock().remove(&itinerary_id)
    }

    /// Drains every slot, clearing the buffer.
    pub fn take_all(&self) -> Vec<(ItineraryId, PendingReorder)> {
        self.slots.lock().drain().collect()
    }

    /// Whether an itinerary has an unflushed reorder.
    pub fn has_pending(&self, itinerary_id: ItineraryId) -> bool {
        self.slots.lock().contains_key(&itinerary_id)
    }

    /// The number of itineraries with an unflushed reorder.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether the buffer is entirely empty.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
