//! Registry of the currently connected sessions.
//!
//! The registry is the only state shared by all session threads. Every
//! operation takes the internal lock for the duration of a map operation and
//! never while talking to a socket. A session is present exactly while its
//! session loop runs.
use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, warn};
use relay_common::Result;

use crate::model::names::NameSource;
use crate::model::session::{ConnectionHandle, ConnectionId, Session};

/// Thread-safe set of sessions keyed by connection.
pub struct ConnectionRegistry {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
    names: Box<dyn NameSource>,
}

impl ConnectionRegistry {
    /// Create an empty registry naming sessions with `names`.
    pub fn new(names: impl NameSource + 'static) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            names: Box::new(names),
        }
    }

    /// Store a new session and return the display identity given to it.
    pub fn register(&self, handle: ConnectionHandle) -> Result<String> {
        let identity = self.names.next_name();
        let session = Session::new(handle, identity.clone());
        let mut sessions = self.sessions.lock()?;
        if let Some(previous) = sessions.insert(session.id, session) {
            warn!("Connection {} registered twice, replacing {}", previous.id, previous.identity);
        }
        debug!("Registry holds {} sessions", sessions.len());
        Ok(identity)
    }

    /// Remove a session. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ConnectionId) -> Result<bool> {
        let mut sessions = self.sessions.lock()?;
        let removed = sessions.remove(&id).is_some();
        debug!("Registry holds {} sessions", sessions.len());
        Ok(removed)
    }

    /// Copy of the sessions registered right now.
    pub fn snapshot(&self) -> Result<Vec<Session>> {
        Ok(self.sessions.lock()?.values().cloned().collect())
    }

    /// Number of registered sessions.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        Ok(self.sessions.lock()?.len())
    }
}
