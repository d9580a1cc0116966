//! Protocol messages, one closed tagged union per direction.
//!
//! The JSON shape of these enums is a versioned contract with clients: the
//! `type` tag selects the message, the `action` tag selects the broadcast
//! payload, and field names are camelCase. Changing any of these is a
//! protocol break.

use crate::ids::{DayId, EventId, ItineraryId};
use crate::payload::{DayDraft, EventDraft, EventOrder, EventPatch, ItineraryPatch};
use crate::types::{Day, Event};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A message from a client to the synchronizer.
///
/// Every mutation carries the itinerary it targets so the coordinator can
/// serialize handling per room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join the room for an itinerary. Acknowledged with `itinerary-ready`
    /// once any pending reorder has been drained.
    JoinItinerary {
        /// Target itinerary.
        itinerary_id: ItineraryId,
    },
    /// Leave the room for an itinerary.
    LeaveItinerary {
        /// Target itinerary.
        itinerary_id: ItineraryId,
    },
    /// Patch the itinerary's own attributes.
    EditItinerary {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// Fields to change.
        patch: ItineraryPatch,
    },
    /// Create a day.
    AddDay {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// The day to create.
        day: DayDraft,
    },
    /// Delete a day. The client sends the surviving days in display order;
    /// the server renumbers and relabels them from `start_date`.
    DeleteDay {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// The day to delete.
        day_id: DayId,
        /// First day of the trip, used to rederive labels.
        start_date: NaiveDate,
        /// The remaining days, in display order.
        days: Vec<Day>,
    },
    /// Create an event within a day.
    AddEvent {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// The day receiving the event.
        day_id: DayId,
        /// The event to create.
        event: EventDraft,
    },
    /// Delete an event.
    DeleteEvent {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// The day the event belongs to.
        day_id: DayId,
        /// The event to delete.
        event_id: EventId,
    },
    /// Patch an event.
    EditEvent {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// The day the event belongs to.
        day_id: DayId,
        /// The event to patch.
        event_id: EventId,
        /// Fields to change.
        patch: EventPatch,
    },
    /// Reorder the events of a day. Broadcast immediately, persisted on the
    /// next flush.
    ReorderEvents {
        /// Target itinerary.
        itinerary_id: ItineraryId,
        /// The day whose events are reordered.
        day_id: DayId,
        /// The full new ordering.
        events: Vec<EventOrder>,
    },
}

impl ClientMessage {
    /// The itinerary this message targets.
    pub fn itinerary_id(&self) -> ItineraryId {
        match self {
            ClientMessage::JoinItinerary { itinerary_id }
            | ClientMessage::LeaveItinerary { itinerary_id }
            | ClientMessage::EditItinerary { itinerary_id, .. }
            | ClientMessage::AddDay { itinerary_id, .. }
            | ClientMessage::DeleteDay { itinerary_id, .. }
            | ClientMessage::AddEvent { itinerary_id, .. }
            | ClientMessage::DeleteEvent { itinerary_id, .. }
            | ClientMessage::EditEvent { itinerary_id, .. }
            | ClientMessage::ReorderEvents { itinerary_id, .. } => *itinerary_id,
        }
    }
}

/// A message from the synchronizer to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Sent to a joining connection once pending writes are drained and the
    /// itinerary may be loaded from the durable store.
    ItineraryReady,
    /// A mutation applied to an itinerary, delivered to every room member
    /// including the originator.
    ItineraryUpdate {
        /// The itinerary that changed.
        itinerary_id: ItineraryId,
        /// What changed.
        #[serde(flatten)]
        update: UpdateAction,
    },
    /// A failure report. Sent to the offending connection for per-message
    /// errors, or to the whole room when a buffered flush fails.
    Error {
        /// Human-readable description.
        message: String,
    },
}

impl ServerMessage {
    /// Builds an error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Builds an update broadcast.
    pub fn update(itinerary_id: ItineraryId, update: UpdateAction) -> Self {
        ServerMessage::ItineraryUpdate {
            itinerary_id,
            update,
        }
    }
}

/// The payload of an `itinerary-update` broadcast: one variant per mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum UpdateAction {
    /// The itinerary's own attributes changed.
    EditItinerary {
        /// The applied patch.
        patch: ItineraryPatch,
    },
    /// A day was created.
    AddDay {
        /// The created day, with its generated id.
        day: Day,
    },
    /// A day was deleted; the surviving days were renumbered and relabeled.
    DeleteDay {
        /// The full recomputed day list.
        days: Vec<Day>,
    },
    /// An event was created.
    AddEvent {
        /// The day receiving the event.
        day_id: DayId,
        /// The created event, with its generated id.
        event: Event,
    },
    /// An event was deleted.
    DeleteEvent {
        /// The day the event belonged to.
        day_id: DayId,
        /// The deleted event.
        event_id: EventId,
    },
    /// An event was patched.
    EditEvent {
        /// The day the event belongs to.
        day_id: DayId,
        /// The patched event.
        event_id: EventId,
        /// The applied patch.
        patch: EventPatch,
    },
    /// A day's events were reordered. Persisted on the next flush.
    ReorderEvents {
        /// The day whose events were reordered.
        day_id: DayId,
        /// The full new ordering.
        events: Vec<EventOrder>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Day;
    use serde_json::json;

    #[test]
    fn client_message_wire_shape() {
        let id = ItineraryId::generate();
        let day_id = DayId::generate();
        let msg = ClientMessage::ReorderEvents {
            itinerary_id: id,
            day_id,
            events: vec![EventOrder {
                id: EventId::generate(),
                order_index: 0,
            }],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "reorder-events");
        assert_eq!(value["itineraryId"], json!(id.0.to_string()));
        assert_eq!(value["events"][0]["orderIndex"], 0);
    }

    #[test]
    fn client_message_round_trip() {
        let msg = ClientMessage::AddEvent {
            itinerary_id: ItineraryId::generate(),
            day_id: DayId::generate(),
            event: EventDraft {
                order_index: 1,
                label: "Sagrada Familia".into(),
                description: None,
                category: Some("landmark".into()),
                image: None,
                start_time: Some("10:00".into()),
                end_time: None,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ClientMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn itinerary_id_helper_covers_all_variants() {
        let id = ItineraryId::generate();
        let msg = ClientMessage::LeaveItinerary { itinerary_id: id };
        assert_eq!(msg.itinerary_id(), id);

        let msg = ClientMessage::EditItinerary {
            itinerary_id: id,
            patch: ItineraryPatch::default(),
        };
        assert_eq!(msg.itinerary_id(), id);
    }

    #[test]
    fn update_broadcast_flattens_action() {
        let id = ItineraryId::generate();
        let day = Day {
            id: DayId::generate(),
            label: "Day 1 - Monday, June 1".into(),
            day_number: 1,
        };
        let msg = ServerMessage::update(id, UpdateAction::AddDay { day: day.clone() });
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "itinerary-update");
        assert_eq!(value["action"], "add-day");
        assert_eq!(value["day"]["dayNumber"], 1);

        let back: ServerMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn ready_and_error_wire_shape() {
        let ready = serde_json::to_value(&ServerMessage::ItineraryReady).unwrap();
        assert_eq!(ready["type"], "itinerary-ready");

        let err = serde_json::to_value(&ServerMessage::error("event not found")).unwrap();
        assert_eq!(err["type"], "error");
        assert_eq!(err["message"], "event not found");
    }

    #[test]
    fn unknown_message_type_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type": "drop-table", "itineraryId": "x"}"#);
        assert!(result.is_err());
    }
}
