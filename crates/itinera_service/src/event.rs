//! Event mutations: validation and persistence orchestration.

use crate::error::{ServiceError, ServiceResult};
use crate::validate::{validate_event, validate_event_patch};
use itinera_protocol::{DayId, Event, EventDraft, EventId, EventOrder, EventPatch};
use itinera_store::EventStore;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates event mutations: validate, persist, return the normalized row.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    /// Creates an event service over the given store.
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a new event, returning it with its generated id.
    pub async fn add_event(&self, day_id: DayId, draft: &EventDraft) -> ServiceResult<Event> {
        let event = validate_event(draft)?;
        let created = self.store.add_event(day_id, event).await?;
        debug!(%day_id, event_id = %created.id, "event created");
        Ok(created)
    }

    /// Deletes an event. Surviving siblings keep their order indices.
    pub async fn delete_event(&self, event_id: EventId) -> ServiceResult<()> {
        if !self.store.delete_event(event_id).await? {
            return Err(ServiceError::NotFound(format!(
                "event {event_id} not found"
            )));
        }
        debug!(%event_id, "event deleted");
        Ok(())
    }

    /// Validates and persists a partial update. Only supplied fields are
    /// touched.
    pub async fn update_event(&self, event_id: EventId, patch: &EventPatch) -> ServiceResult<()> {
        let update = validate_event_patch(patch)?;
        if update.is_empty() {
            return Ok(());
        }
        self.store.update_event(event_id, update).await?;
        Ok(())
    }

    /// Persists a full set of order-index reassignments as one batch.
    ///
    /// This is the only operation invoked from the flush path rather than
    /// directly from a client message.
    pub async fn reorder_events(&self, order: &[EventOrder]) -> ServiceResult<()> {
        if order.is_empty() {
            return Ok(());
        }
        self.store.update_event_order(order).await?;
        debug!(batch = order.len(), "event order persisted");
        Ok(())
    }
}
