//! # Itinera Service
//!
//! The mutation service of the Itinera synchronizer: the only path by which a
//! client message reaches durable storage.
//!
//! This crate provides:
//! - Pure payload validators (shape, required fields, category enumeration,
//!   `HH:MM` times, image shapes)
//! - [`DayService`] and [`EventService`]: validate → store call → normalized
//!   result
//! - [`renumber_days`], the renumber-and-relabel step the coordinator runs
//!   after a day delete
//!
//! # Errors
//!
//! [`ServiceError`] separates `InvalidInput` and `NotFound`, the per-message
//! client errors, from `Persistence`, an infrastructure failure. `is_client_error` tells a caller whether the
//! failure belongs to the sender alone.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod day;
mod error;
mod event;
mod validate;

pub use day::{renumber_days, DayService};
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use validate::{
    validate_day, validate_event, validate_event_patch, validate_itinerary_patch,
};
