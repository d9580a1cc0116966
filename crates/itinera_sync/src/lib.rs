//! # Itinera Sync
//!
//! The realtime collaborative-editing synchronizer for Itinera itineraries.
//!
//! Multiple clients co-edit a single itinerary's days and events; this crate
//! keeps every connected client's view consistent and reconciles
//! high-frequency drag-and-drop reorders against a slower durable store
//! without losing updates or blocking editors.
//!
//! # Architecture
//!
//! - [`RoomRegistry`] — the set of connections per itinerary, with broadcast
//! - [`PendingWrites`] — one coalescing slot per itinerary holding the most
//!   recent unflushed reorder
//! - [`SyncCoordinator`] — dispatches [`ClientMessage`]s: synchronous
//!   persistence for add/delete/edit, buffering for reorders, broadcast to
//!   the room (sender included), periodic and join-time flushes
//!
//! # Consistency contract
//!
//! Within one room, messages are processed and broadcast in arrival order.
//! Add/delete/edit mutations persist before they are broadcast; reorders are
//! broadcast immediately and persisted by the next flush, the next join
//! (which drains the buffer before acknowledging `itinerary-ready`), or the
//! last leave. A failed flush is reported to the room and not retried: for
//! this operation class durability is eventual, attempted once per interval,
//! and failures are observable rather than hidden.
//!
//! # Embedding
//!
//! The crate exposes no transport. Hand each connection's outbound channel to
//! a [`ClientHandle`] and forward decoded messages:
//!
//! ```
//! use itinera_protocol::{ClientMessage, ItineraryId};
//! use itinera_store::MemoryStore;
//! use itinera_sync::{ClientHandle, SyncConfig, SyncCoordinator};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryStore::new());
//! let coordinator = Arc::new(SyncCoordinator::with_shared_store(
//!     SyncConfig::default(),
//!     store,
//! ));
//! let flusher = coordinator.spawn_flusher();
//!
//! let (client, mut outbox) = ClientHandle::channel();
//! coordinator
//!     .handle(
//!         &client,
//!         ClientMessage::JoinItinerary {
//!             itinerary_id: ItineraryId::generate(),
//!         },
//!     )
//!     .await;
//! assert!(outbox.recv().await.is_some()); // itinerary-ready
//! # flusher.abort();
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod connection;
mod coordinator;
mod pending;
mod room;

pub use config::{SyncConfig, DEFAULT_FLUSH_INTERVAL};
pub use connection::ClientHandle;
pub use coordinator::SyncCoordinator;
pub use pending::{PendingReorder, PendingWrites};
pub use room::{Departure, RoomRegistry};
