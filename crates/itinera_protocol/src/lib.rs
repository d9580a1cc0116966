//! # Itinera Protocol
//!
//! Wire protocol and domain types for the Itinera collaborative itinerary
//! synchronizer.
//!
//! This crate provides:
//! - Identifier newtypes (`ItineraryId`, `DayId`, `EventId`, `ConnectionId`)
//! - Domain types (`Itinerary`, `Day`, `Event`, `Category`, `EventTime`)
//! - Mutation payloads (drafts and partial patches)
//! - The client/server message unions (`ClientMessage`, `ServerMessage`)
//!
//! # Contract
//!
//! The serde-derived JSON shape of the message unions is a versioned contract
//! shared with every client: messages are tagged by `type`, broadcasts by
//! `action`, and fields are camelCase. The dispatch over these unions is
//! exhaustive, so adding a message variant is a compile-visible change
//! everywhere it must be handled.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod ids;
mod messages;
mod payload;
mod types;

pub use ids::{ConnectionId, DayId, EventId, ItineraryId};
pub use messages::{ClientMessage, ServerMessage, UpdateAction};
pub use payload::{DayDraft, EventDraft, EventOrder, EventPatch, ItineraryPatch};
pub use types::{
    Category, Day, Event, EventTime, Itinerary, ParseCategoryError, ParseTimeError,
};
