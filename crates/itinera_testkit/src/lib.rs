//! # Itinera Testkit
//!
//! Shared test support for the Itinera workspace:
//! - [`seeded_store`]: an in-memory store holding a three-day itinerary with
//!   events, plus handles to everything it seeded
//! - [`FlakyStore`]: a store wrapper with reorder failure injection for
//!   exercising flush-error paths

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fixtures;
mod flaky;

pub use fixtures::{seeded_start_date, seeded_store, SeededItinerary};
pub use flaky::FlakyStore;
