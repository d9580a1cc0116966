//! Room registry.
//!
//! A room is the set of connections currently collaborating on one itinerary.
//! Rooms are ephemeral, in-memory and process-lifetime: created on first
//! join, reaped on last leave, rebuilt from scratch after a restart.

use crate::connection::ClientHandle;
use itinera_protocol::{ConnectionId, ItineraryId, ServerMessage};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct Room {
    members: HashMap<ConnectionId, ClientHandle>,
}

/// What happened when a connection left a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Whether the connection was actually a member.
    pub removed: bool,
    /// Whether the room became empty and was reaped.
    pub room_closed: bool,
}

/// Maps itinerary identifiers to the connections editing them.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<ItineraryId, Room>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room, creating the room if absent. Returns the
    /// member count after the join.
    pub fn join(&self, itinerary_id: ItineraryId, handle: ClientHandle) -> usize {
        let mut rooms = self.rooms.write();
        let room = rooms.entry(itinerary_id).or_default();
        room.members.insert(handle.id(), handle);
        room.members.len()
    }

    /// Removes a connection from a room. An empty room is reaped immediately;
    /// re-joining recreates it cheaply.
    pub fn leave(&self, itinerary_id: ItineraryId, connection_id: ConnectionId) -> Departure {
        let mut rooms = self.rooms.write();
        let Some(room) = rooms.get_mut(&itinerary_id) else {
            return Departure {
                removed: false,
                room_closed: false,
            };
        };
        let removed = room.members.remove(&connection_id).is_some();
        let room_closed = room.members.is_empty();
        if room_closed {
            rooms.remove(&itinerary_id);
        }
        Departure {
            removed,
            room_closed,
        }
    }

    /// Delivers a message to every connection currently in the room,
    /// including the originating sender. Returns how many connections
    /// accepted it.
    ///
    /// A connection whose transport is already gone is skipped; persistence
    /// triggered by its messages has long since completed on its own.
    pub fn broadcast(&self, itinerary_id: ItineraryId, message: &ServerMessage) -> usize {
        let rooms = self.rooms.read();
        let Some(room) = rooms.get(&itinerary_id) else {
            return 0;
        };
        let mut delivered = 0;
        for handle in room.members.values() {
            if handle.send(message) {
                delivered += 1;
            } else {
                debug!(%itinerary_id, connection = %handle.id(), "skipping closed connection");
            }
        }
        delivered
    }

    /// The number of connections in a room (0 when the room does not exist).
    pub fn member_count(&self, itinerary_id: ItineraryId) -> usize {
        self.rooms
            .read()
            .get(&itinerary_id)
            .map_or(0, |room| room.members.len())
    }

    /// The number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }
}
