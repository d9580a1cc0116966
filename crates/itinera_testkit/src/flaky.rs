//! Failure injection for store seams.

use async_trait::async_trait;
use itinera_protocol::{Day, DayId, Event, EventId, EventOrder, Itinerary, ItineraryId};
use itinera_store::{
    DayStore, EventStore, EventUpdate, ItineraryStore, ItineraryUpdate, MemoryStore, NewDay,
    NewEvent, StoreError, StoreResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A store wrapper that can be told to fail reorder batches, for exercising
/// the flush-failure paths. Everything else delegates to the wrapped
/// [`MemoryStore`].
pub struct FlakyStore {
    inner: Arc<MemoryStore>,
    fail_reorders: AtomicBool,
}

impl FlakyStore {
    /// Wraps a memory store.
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_reorders: AtomicBool::new(false),
        }
    }

    /// Turns reorder failure injection on or off.
    pub fn set_fail_reorders(&self, fail: bool) {
        self.fail_reorders.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store.
    pub fn inner(&self) -> &Arc<MemoryStore> {
        &self.inner
    }
}

#[async_trait]
impl DayStore for FlakyStore {
    async fn add_day(&self, itinerary_id: ItineraryId, day: NewDay) -> StoreResult<Day> {
        self.inner.add_day(itinerary_id, day).await
    }

    async fn delete_day(&self, day_id: DayId) -> StoreResult<bool> {
        self.inner.delete_day(day_id).await
    }

    async fn update_days(&self, days: &[Day]) -> StoreResult<()> {
        self.inner.update_days(days).await
    }
}

#[async_trait]
impl EventStore for FlakyStore {
    async fn add_event(&self, day_id: DayId, event: NewEvent) -> StoreResult<Event> {
        self.inner.add_event(day_id, event).await
    }

    async fn delete_event(&self, event_id: EventId) -> StoreResult<bool> {
        self.inner.delete_event(event_id).await
    }

    async fn update_event(&self, event_id: EventId, update: EventUpdate) -> StoreResult<()> {
        self.inner.update_event(event_id, update).await
    }

    async fn update_event_order(&self, order: &[EventOrder]) -> StoreResult<()> {
        if self.fail_reorders.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected reorder failure".into()));
        }
        self.inner.update_event_order(order).await
    }
}

#[async_trait]
impl ItineraryStore for FlakyStore {
    async fn fetch_itinerary(&self, id: ItineraryId) -> StoreResult<Option<Itinerary>> {
        self.inner.fetch_itinerary(id).await
    }

    async fn update_itinerary(&self, id: ItineraryId, patch: ItineraryUpdate) -> StoreResult<()> {
        self.inner.update_itinerary(id, patch).await
    }
}
