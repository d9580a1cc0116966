//! Error types for store operations.

use itinera_protocol::{DayId, EventId, ItineraryId};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A day id referenced no existing day.
    #[error("unknown day: {0}")]
    UnknownDay(DayId),

    /// An event id referenced no existing event.
    #[error("unknown event: {0}")]
    UnknownEvent(EventId),

    /// An itinerary id referenced no existing itinerary.
    #[error("unknown itinerary: {0}")]
    UnknownItinerary(ItineraryId),

    /// The backend failed for infrastructure reasons (connectivity, I/O,
    /// transaction rollback).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// True when the error names a missing entity rather than an
    /// infrastructure failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownDay(_)
                | StoreError::UnknownEvent(_)
                | StoreError::UnknownItinerary(_)
        )
    }
}
