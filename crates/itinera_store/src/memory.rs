//! In-memory reference store.
//!
//! The production deployment backs the store traits with a relational
//! database; this implementation holds everything in process memory behind a
//! single `RwLock`. It honors the same contract (including all-or-nothing
//! order batches) and is what the test suite and standalone embedders run
//! against.

use crate::error::{StoreError, StoreResult};
use crate::records::{EventUpdate, ItineraryUpdate, NewDay, NewEvent};
use crate::traits::{DayStore, EventStore, ItineraryStore};
use async_trait::async_trait;
use itinera_protocol::{Day, DayId, Event, EventId, EventOrder, Itinerary, ItineraryId};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct DayRow {
    itinerary_id: ItineraryId,
    day: Day,
}

#[derive(Debug, Default)]
struct Inner {
    itineraries: HashMap<ItineraryId, Itinerary>,
    days: HashMap<DayId, DayRow>,
    events: HashMap<EventId, Event>,
}

/// An in-memory implementation of all three store seams.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an itinerary. Replaces any existing itinerary with the same id.
    pub fn insert_itinerary(&self, itinerary: Itinerary) {
        self.inner
            .write()
            .itineraries
            .insert(itinerary.id, itinerary);
    }

    /// Seeds a day under an itinerary, bypassing validation. Test setup only
    /// needs ready-made rows, not the full mutation path.
    pub fn insert_day(&self, itinerary_id: ItineraryId, day: Day) {
        self.inner
            .write()
            .days
            .insert(day.id, DayRow { itinerary_id, day });
    }

    /// Seeds an event, bypassing validation.
    pub fn insert_event(&self, event: Event) {
        self.inner.write().events.insert(event.id, event);
    }

    /// The days of an itinerary, sorted by day number.
    pub fn days_of(&self, itinerary_id: ItineraryId) -> Vec<Day> {
        let inner = self.inner.read();
        let mut days: Vec<Day> = inner
            .days
            .values()
            .filter(|row| row.itinerary_id == itinerary_id)
            .map(|row| row.day.clone())
            .collect();
        days.sort_by_key(|d| d.day_number);
        days
    }

    /// The events of a day, sorted by order index.
    pub fn events_of(&self, day_id: DayId) -> Vec<Event> {
        let inner = self.inner.read();
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.day_id == day_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.order_index);
        events
    }

    /// Looks up a single event.
    pub fn event(&self, event_id: EventId) -> Option<Event> {
        self.inner.read().events.get(&event_id).cloned()
    }

    /// Looks up a single day.
    pub fn day(&self, day_id: DayId) -> Option<Day> {
        self.inner.read().days.get(&day_id).map(|row| row.day.clone())
    }
}

#[async_trait]
impl DayStore for MemoryStore {
    async fn add_day(&self, itinerary_id: ItineraryId, day: NewDay) -> StoreResult<Day> {
        let mut inner = self.inner.write();
        if !inner.itineraries.contains_key(&itinerary_id) {
            return Err(StoreError::UnknownItinerary(itinerary_id));
        }
        let created = Day {
            id: DayId::generate(),
            label: day.label,
            day_number: day.day_number,
        };
        inner.days.insert(
            created.id,
            DayRow {
                itinerary_id,
                day: created.clone(),
            },
        );
        Ok(created)
    }

    async fn delete_day(&self, day_id: DayId) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        if inner.days.remove(&day_id).is_none() {
            return Ok(false);
        }
        // Cascade, as the relational schema does via foreign keys.
        inner.events.retain(|_, e| e.day_id != day_id);
        Ok(true)
    }

    async fn update_days(&self, days: &[Day]) -> StoreResult<()> {
        let mut inner = self.inner.write();
        for day in days {
            if !inner.days.contains_key(&day.id) {
                return Err(StoreError::UnknownDay(day.id));
            }
        }
        for day in days {
            if let Some(row) = inner.days.get_mut(&day.id) {
                row.day.label = day.label.clone();
                row.day.day_number = day.day_number;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn add_event(&self, day_id: DayId, event: NewEvent) -> StoreResult<Event> {
        let mut inner = self.inner.write();
        if !inner.days.contains_key(&day_id) {
            return Err(StoreError::UnknownDay(day_id));
        }
        let created = Event {
            id: EventId::generate(),
            day_id,
            order_index: event.order_index,
            label: event.label,
            description: event.description,
            category: event.category,
            image: event.image,
            start_time: event.start_time,
            end_time: event.end_time,
        };
        inner.events.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_event(&self, event_id: EventId) -> StoreResult<bool> {
        Ok(self.inner.write().events.remove(&event_id).is_some())
    }

    async fn update_event(&self, event_id: EventId, update: EventUpdate) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let event = inner
            .events
            .get_mut(&event_id)
            .ok_or(StoreError::UnknownEvent(event_id))?;

        if let Some(label) = update.label {
            event.label = label;
        }
        if let Some(description) = update.description {
            event.description = Some(description);
        }
        if let Some(category) = update.category {
            event.category = Some(category);
        }
        if let Some(image) = update.image {
            event.image = Some(image);
        }
        if let Some(start_time) = update.start_time {
            event.start_time = Some(start_time);
        }
        if let Some(end_time) = update.end_time {
            event.end_time = Some(end_time);
        }
        Ok(())
    }

    async fn update_event_order(&self, order: &[EventOrder]) -> StoreResult<()> {
        let mut inner = self.inner.write();
        // Validate the whole batch before touching anything, so a bad entry
        // leaves every index as it was.
        for entry in order {
            if !inner.events.contains_key(&entry.id) {
                return Err(StoreError::UnknownEvent(entry.id));
            }
        }
        for entry in order {
            if let Some(event) = inner.events.get_mut(&entry.id) {
                event.order_index = entry.order_index;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ItineraryStore for MemoryStore {
    async fn fetch_itinerary(&self, id: ItineraryId) -> StoreResult<Option<Itinerary>> {
        Ok(self.inner.read().itineraries.get(&id).cloned())
    }

    async fn update_itinerary(&self, id: ItineraryId, patch: ItineraryUpdate) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let itinerary = inner
            .itineraries
            .get_mut(&id)
            .ok_or(StoreError::UnknownItinerary(id))?;

        if let Some(title) = patch.title {
            itinerary.title = title;
        }
        if let Some(description) = patch.description {
            itinerary.description = Some(description);
        }
        if let Some(start_date) = patch.start_date {
            itinerary.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            itinerary.end_date = end_date;
        }
        Ok(())
    }
}
