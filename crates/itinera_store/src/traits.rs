//! Store seams consumed by the synchronizer.
//!
//! These traits abstract the durable CRUD layer, allowing different backends
//! (relational, in-memory for tests, a remote service). Every method is an
//! async I/O boundary; callers must not hold room-level locks across a call
//! for longer than the single mutation being processed.

use crate::error::StoreResult;
use crate::records::{EventUpdate, ItineraryUpdate, NewDay, NewEvent};
use async_trait::async_trait;
use itinera_protocol::{Day, DayId, Event, EventId, EventOrder, Itinerary, ItineraryId};

/// Durable CRUD for itinerary days.
#[async_trait]
pub trait DayStore: Send + Sync {
    /// Persists a new day and returns it with its generated id.
    async fn add_day(&self, itinerary_id: ItineraryId, day: NewDay) -> StoreResult<Day>;

    /// Deletes a day. Returns `false` when no such day exists.
    ///
    /// Sibling days are NOT renumbered here; the caller issues the bulk
    /// [`update_days`](DayStore::update_days) that restores contiguity.
    async fn delete_day(&self, day_id: DayId) -> StoreResult<bool>;

    /// Bulk-updates label and day number for each given day, by id.
    async fn update_days(&self, days: &[Day]) -> StoreResult<()>;
}

/// Durable CRUD for day events, including the bulk order update.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persists a new event and returns it with its generated id.
    async fn add_event(&self, day_id: DayId, event: NewEvent) -> StoreResult<Event>;

    /// Deletes an event. Returns `false` when no such event exists.
    ///
    /// Surviving siblings keep their order indices; gaps are tolerated since
    /// indices are only used for sort order.
    async fn delete_event(&self, event_id: EventId) -> StoreResult<bool>;

    /// Applies a partial update to an event. Fails with
    /// [`StoreError::UnknownEvent`](crate::StoreError::UnknownEvent) when the
    /// event does not exist.
    async fn update_event(&self, event_id: EventId, update: EventUpdate) -> StoreResult<()>;

    /// Persists a full set of order-index reassignments as one batch,
    /// all-or-nothing.
    async fn update_event_order(&self, order: &[EventOrder]) -> StoreResult<()>;
}

/// Read/update access to the itinerary aggregate itself.
///
/// The synchronizer only needs this to fulfil `edit-itinerary` and to let a
/// freshly-ready client fetch state; the full aggregate is owned by the CRUD
/// layer outside this workspace.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Fetches an itinerary by id, or `None` when absent.
    async fn fetch_itinerary(&self, id: ItineraryId) -> StoreResult<Option<Itinerary>>;

    /// Applies a partial update to an itinerary. Fails with
    /// [`StoreError::UnknownItinerary`](crate::StoreError::UnknownItinerary)
    /// when the itinerary does not exist.
    async fn update_itinerary(&self, id: ItineraryId, patch: ItineraryUpdate) -> StoreResult<()>;
}
