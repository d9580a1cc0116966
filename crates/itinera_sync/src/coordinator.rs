//! The synchronization coordinator.
//!
//! Receives client mutation messages, persists them through the mutation
//! service (or buffers reorders), and broadcasts the result to the room.
//! Handling is serialized per itinerary: messages for one room are processed
//! and broadcast in arrival order, while rooms never contend with each other.

use crate::config::SyncConfig;
use crate::connection::ClientHandle;
use crate::pending::{PendingReorder, PendingWrites};
use crate::room::RoomRegistry;
use itinera_protocol::{ClientMessage, ConnectionId, ItineraryId, ServerMessage, UpdateAction};
use itinera_service::{
    renumber_days, validate_itinerary_patch, DayService, EventService, ServiceResult,
};
use itinera_store::{DayStore, EventStore, ItineraryStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Per-itinerary async mutexes. Guarantees single-threaded handling per room
/// without sharing a lock across rooms.
///
/// Entries are kept for the process lifetime: reaping them alongside the room
/// could hand two concurrent joiners different mutexes for the same
/// itinerary, and one `Mutex<()>` per itinerary ever edited is cheap.
#[derive(Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<ItineraryId, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    fn acquire(&self, itinerary_id: ItineraryId) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.locks.lock().entry(itinerary_id).or_default())
    }
}

/// The central component of the synchronizer.
///
/// One coordinator hosts all rooms of the process. Each client holds a
/// [`ClientHandle`]; the embedding transport decodes wire frames into
/// [`ClientMessage`]s and passes them to [`handle`](Self::handle), which is
/// fire-and-forget from the client's perspective: failures come back as
/// `error` messages, never as a return value.
pub struct SyncCoordinator {
    config: SyncConfig,
    rooms: RoomRegistry,
    pending: PendingWrites,
    days: DayService,
    events: EventService,
    itineraries: Arc<dyn ItineraryStore>,
    locks: KeyedLocks,
}

impl SyncCoordinator {
    /// Creates a coordinator over the given store seams.
    pub fn new(
        config: SyncConfig,
        day_store: Arc<dyn DayStore>,
        event_store: Arc<dyn EventStore>,
        itinerary_store: Arc<dyn ItineraryStore>,
    ) -> Self {
        Self {
            config,
            rooms: RoomRegistry::new(),
            pending: PendingWrites::new(),
            days: DayService::new(day_store),
            events: EventService::new(event_store),
            itineraries: itinerary_store,
            locks: KeyedLocks::default(),
        }
    }

    /// Creates a coordinator where one backend implements all three store
    /// seams, as `MemoryStore` does.
    pub fn with_shared_store<S>(config: SyncConfig, store: Arc<S>) -> Self
    where
        S: DayStore + EventStore + ItineraryStore + 'static,
    {
        Self::new(
            config,
            Arc::clone(&store) as Arc<dyn DayStore>,
            Arc::clone(&store) as Arc<dyn EventStore>,
            store as Arc<dyn ItineraryStore>,
        )
    }

    /// Handles one client message.
    ///
    /// Per-message failures (`InvalidInput`, `NotFound`, synchronous
    /// persistence errors) are reported to the sender alone; they never
    /// affect other room members.
    pub async fn handle(&self, client: &ClientHandle, message: ClientMessage) {
        let itinerary_id = message.itinerary_id();
        let room_lock = self.locks.acquire(itinerary_id);
        let _serial = room_lock.lock().await;

        if let Err(err) = self.dispatch(client, message).await {
            if err.is_client_error() {
                warn!(%itinerary_id, connection = %client.id(), error = %err, "mutation rejected");
            } else {
                error!(%itinerary_id, connection = %client.id(), error = %err, "mutation failed");
            }
            client.send(&ServerMessage::error(err.to_string()));
        }
    }

    async fn dispatch(&self, client: &ClientHandle, message: ClientMessage) -> ServiceResult<()> {
        match message {
            ClientMessage::JoinItinerary { itinerary_id } => {
                self.handle_join(itinerary_id, client).await;
                Ok(())
            }
            ClientMessage::LeaveItinerary { itinerary_id } => {
                self.handle_leave(itinerary_id, client.id()).await;
                Ok(())
            }
            ClientMessage::EditItinerary { itinerary_id, patch } => {
                let update = validate_itinerary_patch(&patch)?;
                self.itineraries.update_itinerary(itinerary_id, update).await?;
                self.broadcast(itinerary_id, UpdateAction::EditItinerary { patch });
                Ok(())
            }
            ClientMessage::AddDay { itinerary_id, day } => {
                let created = self.days.add_day(itinerary_id, &day).await?;
                self.broadcast(itinerary_id, UpdateAction::AddDay { day: created });
                Ok(())
            }
            ClientMessage::DeleteDay {
                itinerary_id,
                day_id,
                start_date,
                days,
            } => {
                self.days.delete_day(day_id).await?;
                // Restore contiguity: position i becomes day i+1 and its
                // label is rederived from the start date.
                let renumbered = renumber_days(start_date, &days);
                self.days.update_days(&renumbered).await?;
                self.broadcast(itinerary_id, UpdateAction::DeleteDay { days: renumbered });
                Ok(())
            }
            ClientMessage::AddEvent {
                itinerary_id,
                day_id,
                event,
            } => {
                let created = self.events.add_event(day_id, &event).await?;
                self.broadcast(
                    itinerary_id,
                    UpdateAction::AddEvent {
                        day_id,
                        event: created,
                    },
                );
                Ok(())
            }
            ClientMessage::DeleteEvent {
                itinerary_id,
                day_id,
                event_id,
            } => {
                self.events.delete_event(event_id).await?;
                self.broadcast(itinerary_id, UpdateAction::DeleteEvent { day_id, event_id });
                Ok(())
            }
            ClientMessage::EditEvent {
                itinerary_id,
                day_id,
                event_id,
                patch,
            } => {
                self.events.update_event(event_id, &patch).await?;
                self.broadcast(
                    itinerary_id,
                    UpdateAction::EditEvent {
                        day_id,
                        event_id,
                        patch,
                    },
                );
                Ok(())
            }
            ClientMessage::ReorderEvents {
                itinerary_id,
                day_id,
                events,
            } => {
                // Broadcast first for zero perceptible latency; durability
                // waits for the next flush or join-drain.
                self.pending.record(
                    itinerary_id,
                    PendingReorder {
                        day_id,
                        events: events.clone(),
                    },
                );
                self.broadcast(itinerary_id, UpdateAction::ReorderEvents { day_id, events });
                Ok(())
            }
        }
    }

    async fn handle_join(&self, itinerary_id: ItineraryId, client: &ClientHandle) {
        let members = self.rooms.join(itinerary_id, client.clone());
        info!(%itinerary_id, connection = %client.id(), members, "client joined room");

        // Drain the pending reorder before the joiner is told it may load
        // state, so it never reads an ordering older than what the room is
        // already viewing.
        if let Some(reorder) = self.pending.take(itinerary_id) {
            self.persist_reorder(itinerary_id, reorder, true).await;
        }
        client.send(&ServerMessage::ItineraryReady);
    }

    async fn handle_leave(&self, itinerary_id: ItineraryId, connection_id: ConnectionId) {
        let departure = self.rooms.leave(itinerary_id, connection_id);
        info!(%itinerary_id, connection = %connection_id, "client left room");

        // On last leave the room is reaped and nothing but the timer would
        // keep the pending reorder alive; flush it now instead of letting
        // durability wait for the next join.
        if departure.room_closed {
            if let Some(reorder) = self.pending.take(itinerary_id) {
                self.persist_reorder(itinerary_id, reorder, false).await;
            }
        }
    }

    /// Persists a drained reorder. The slot was already cleared when the
    /// record was taken; a failure is reported, not retried.
    async fn persist_reorder(
        &self,
        itinerary_id: ItineraryId,
        reorder: PendingReorder,
        broadcast_failure: bool,
    ) {
        match self.events.reorder_events(&reorder.events).await {
            Ok(()) => {
                info!(%itinerary_id, day_id = %reorder.day_id, "pending reorder persisted");
            }
            Err(err) => {
                error!(%itinerary_id, day_id = %reorder.day_id, error = %err,
                    "failed to persist pending reorder");
                if broadcast_failure {
                    // The whole room already believes the un-persisted order
                    // is true; tell everyone it did not durably stick.
                    self.rooms
                        .broadcast(itinerary_id, &ServerMessage::error(err.to_string()));
                }
            }
        }
    }

    /// Drains every non-empty buffer slot into the event store.
    pub async fn flush_pending(&self) {
        for (itinerary_id, reorder) in self.pending.take_all() {
            self.persist_reorder(itinerary_id, reorder, true).await;
        }
    }

    /// Spawns the background flusher, which drains buffered reorders every
    /// [`SyncConfig::flush_interval`]. Abort the returned handle to stop it.
    pub fn spawn_flusher(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let period = coordinator.config.flush_interval;
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                coordinator.flush_pending().await;
            }
        })
    }

    fn broadcast(&self, itinerary_id: ItineraryId, update: UpdateAction) {
        self.rooms
            .broadcast(itinerary_id, &ServerMessage::update(itinerary_id, update));
    }

    /// The coordinator's configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The number of connections in an itinerary's room.
    pub fn member_count(&self, itinerary_id: ItineraryId) -> usize {
        self.rooms.member_count(itinerary_id)
    }

    /// The number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.room_count()
    }

    /// Whether an itinerary has a buffered reorder awaiting flush.
    pub fn has_pending(&self, itinerary_id: ItineraryId) -> bool {
        self.pending.has_pending(itinerary_id)
    }
}
