use crate::model::session::ConnectionId;
use crate::registry::ConnectionRegistry;
use crate::session::{CommandDispatcher, run_session};
use log::{debug, error, info};
use relay_common::net::HANDSHAKE_TIMEOUT;
use relay_common::{RelayError, Result};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

/// TCP listener that upgrades every accepted connection to a WebSocket session.
///
/// Each connection gets its own thread. A failing handshake or session is
/// logged and only ends that connection; the accept loop keeps running.
pub struct RelayListener {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl RelayListener {
    /// Bind a new listener to the provided `bind_addr` (e.g., `127.0.0.1:8080`).
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking accept loop.
    pub fn serve(self, registry: Arc<ConnectionRegistry>, dispatcher: CommandDispatcher) -> Result<()> {
        info!("Relay is listening on ws://{}", self.local_addr()?);

        let mut next_id = 0u64;
        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    next_id += 1;
                    let id = ConnectionId::new(next_id);
                    let registry = Arc::clone(&registry);
                    let dispatcher = dispatcher.clone();
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, id, registry, dispatcher) {
                            error!("Session {} failed: {}", id, e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

fn handle_connection(
    stream: TcpStream,
    id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
    dispatcher: CommandDispatcher,
) -> Result<()> {
    debug!("Accepted {} from {:?}", id, stream.peer_addr());
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;
    let socket = tungstenite::accept(stream).map_err(|e| RelayError::Handshake(e.to_string()))?;
    run_session(socket, id, registry, dispatcher)
}
