//! # Itinera Store
//!
//! Durable-store seams for the Itinera synchronizer.
//!
//! This crate provides:
//! - The [`DayStore`], [`EventStore`] and [`ItineraryStore`] traits — the
//!   only persistence surface the synchronizer touches
//! - Validated input records ([`NewDay`], [`NewEvent`], [`EventUpdate`],
//!   [`ItineraryUpdate`]) produced by the mutation validators
//! - [`MemoryStore`], a process-local reference implementation used by the
//!   test suite and by embedders without a relational backend
//!
//! Rooms and pending reorder buffers carry no durability of their own; the
//! store behind these traits is always the source of truth.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod memory;
mod records;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use records::{EventUpdate, ItineraryUpdate, NewDay, NewEvent};
pub use traits::{DayStore, EventStore, ItineraryStore};
