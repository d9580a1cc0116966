//! Client connection handles.
//!
//! The synchronizer never owns a socket. The embedding transport (a
//! WebSocket layer, a test harness) creates one [`ClientHandle`] per
//! connection and forwards everything sent on it to the wire. Identity is
//! stable for the lifetime of one join/leave pair; a reconnect gets a fresh
//! handle and a fresh `join-itinerary`.

use itinera_protocol::{ConnectionId, ServerMessage};
use tokio::sync::mpsc;

/// The coordinator-facing side of one client connection.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ConnectionId,
    outbox: mpsc::UnboundedSender<ServerMessage>,
}

impl ClientHandle {
    /// Wraps an existing outbound channel.
    pub fn new(id: ConnectionId, outbox: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { id, outbox }
    }

    /// Creates a handle together with the receiving half of its outbox.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(ConnectionId::generate(), tx), rx)
    }

    /// This connection's identity.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues a message for delivery. Returns `false` when the connection is
    /// gone; the caller skips it and moves on.
    pub fn send(&self, message: &ServerMessage) -> bool {
        self.outbox.send(message.clone()).is_ok()
    }
}
