//! Ready-made itinerary fixtures.

use chrono::NaiveDate;
use itinera_protocol::{Day, DayId, Event, EventId, Itinerary, ItineraryId};
use itinera_store::MemoryStore;
use std::sync::Arc;

/// Handles to the rows seeded by [`seeded_store`].
#[derive(Debug, Clone)]
pub struct SeededItinerary {
    /// The seeded itinerary.
    pub itinerary_id: ItineraryId,
    /// Three day ids, in day-number order.
    pub day_ids: Vec<DayId>,
    /// Three event ids under day 1, in order-index order.
    pub event_ids: Vec<EventId>,
}

/// The start date of the seeded itinerary (a Saturday).
pub fn seeded_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
}

/// Builds a store holding one three-day itinerary whose first day carries
/// three events with contiguous order indices.
pub fn seeded_store() -> (Arc<MemoryStore>, SeededItinerary) {
    let store = Arc::new(MemoryStore::new());
    let itinerary_id = ItineraryId::generate();
    let start_date = seeded_start_date();

    store.insert_itinerary(Itinerary {
        id: itinerary_id,
        title: "Weekend in Porto".into(),
        description: None,
        start_date,
        end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or(start_date),
    });

    let labels = [
        "Day 1 - Saturday, June 1",
        "Day 2 - Sunday, June 2",
        "Day 3 - Monday, June 3",
    ];
    let mut day_ids = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let day = Day {
            id: DayId::generate(),
            label: (*label).to_string(),
            day_number: i as u32 + 1,
        };
        day_ids.push(day.id);
        store.insert_day(itinerary_id, day);
    }

    let mut event_ids = Vec::new();
    for (i, label) in ["Ribeira walk", "Francesinha lunch", "Port cellar tour"]
        .iter()
        .enumerate()
    {
        let event = Event {
            id: EventId::generate(),
            day_id: day_ids[0],
            order_index: i as u32,
            label: (*label).to_string(),
            description: None,
            category: None,
            image: None,
            start_time: None,
            end_time: None,
        };
        event_ids.push(event.id);
        store.insert_event(event);
    }

    (
        store,
        SeededItinerary {
            itinerary_id,
            day_ids,
            event_ids,
        },
    )
}
