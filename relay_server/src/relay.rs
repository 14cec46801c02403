//! Fan-out of one message to every registered session.
use std::sync::Arc;

use log::{error, warn};

use crate::registry::ConnectionRegistry;

/// Delivers messages to all sessions of a registry.
///
/// Sessions are snapshotted before delivery, so a client connecting or leaving
/// mid-broadcast may or may not get the message. Delivery only queues the text
/// in each mailbox and never waits on a socket; a closed mailbox is skipped.
#[derive(Clone)]
pub struct BroadcastRelay {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastRelay {
    /// Create a relay over `registry`.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Send `message` to everyone connected. Returns the number of sessions reached.
    pub fn broadcast(&self, message: &str) -> usize {
        let sessions = match self.registry.snapshot() {
            Ok(sessions) => sessions,
            Err(e) => {
                error!("Broadcast dropped, registry unavailable: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        for session in &sessions {
            match session.deliver(message) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Skipping {} ({}): {}", session.identity, session.peer, e),
            }
        }
        delivered
    }
}
