//! Per-connection bookkeeping records.
//!
//! A `ConnectionHandle` is what the listener knows about a fresh connection;
//! registering it yields a `Session`, which adds the display identity. The
//! WebSocket itself never enters the registry: other sessions reach a client
//! through its mailbox, a channel drained by the client's own session loop.
use std::fmt;
use std::net::SocketAddr;

use crossbeam_channel::Sender;
use relay_common::RelayError;

/// Opaque identity of one transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw connection number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Freshly accepted connection, not registered yet.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Connection key in the registry.
    pub id: ConnectionId,
    /// Remote address of the client.
    pub peer: SocketAddr,
    /// Sending half of the client's mailbox.
    pub outbox: Sender<String>,
}

/// Registered client as seen by the registry and the broadcast relay.
#[derive(Debug, Clone)]
pub struct Session {
    /// Connection key in the registry.
    pub id: ConnectionId,
    /// Remote address of the client.
    pub peer: SocketAddr,
    /// Display name assigned at registration.
    pub identity: String,
    outbox: Sender<String>,
}

impl Session {
    /// Attach `identity` to a connection.
    pub fn new(handle: ConnectionHandle, identity: String) -> Self {
        Self {
            id: handle.id,
            peer: handle.peer,
            identity,
            outbox: handle.outbox,
        }
    }

    /// Queue `message` for this client. Fails once the session loop is gone.
    pub fn deliver(&self, message: &str) -> Result<(), RelayError> {
        self.outbox
            .send(message.to_string())
            .map_err(|_| RelayError::ChannelSend(format!("mailbox of {} is closed", self.id)))
    }
}
