//! Per-connection session loop and command dispatch.
//!
//! Each accepted WebSocket runs `run_session` on its own thread:
//!
//! 1. the connection is registered and receives a display identity;
//! 2. the loop alternates between flushing the session mailbox into the socket
//!    and waiting up to `POLL_INTERVAL` for an inbound frame;
//! 3. every text frame goes through `CommandDispatcher`, which either asks the
//!    `ExchangeService` for a snapshot or prefixes the text with the sender's
//!    identity, and broadcasts the outcome;
//! 4. when the peer closes (or anything fails) the `Registration` guard removes
//!    the session from the registry, whichever way the loop was left.
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError, unbounded};
use log::{debug, error, info};
use relay_common::exchange::ExchangeService;
use relay_common::net::POLL_INTERVAL;
use relay_common::{Command, RelayError, Result};
use tungstenite::error::ProtocolError;
use tungstenite::{Message, WebSocket};

use crate::model::session::{ConnectionHandle, ConnectionId};
use crate::registry::ConnectionRegistry;
use crate::relay::BroadcastRelay;

/// Routes inbound text either to the exchange service or straight to the relay.
#[derive(Clone)]
pub struct CommandDispatcher {
    relay: BroadcastRelay,
    exchange: Arc<ExchangeService>,
}

impl CommandDispatcher {
    /// Create a dispatcher broadcasting through `relay`.
    pub fn new(relay: BroadcastRelay, exchange: Arc<ExchangeService>) -> Self {
        Self { relay, exchange }
    }

    /// Handle one text frame sent by `identity`. Returns how many sessions got
    /// the resulting broadcast; a failed exchange request broadcasts nothing.
    pub fn dispatch(&self, identity: &str, text: &str) -> usize {
        let message = match Command::parse(text) {
            Command::LiveExchange => {
                debug!("{} requested live rates", identity);
                self.exchange.live_snapshot()
            }
            Command::HistoricalExchange { days_back } => {
                debug!("{} requested rates for {} days", identity, days_back);
                self.exchange.historical_snapshot(days_back)
            }
            Command::Chat { text } => Some(format!("{}: {}", identity, text)),
        };
        match message {
            Some(message) => self.relay.broadcast(&message),
            None => 0,
        }
    }
}

/// Keeps a session registered for as long as it lives.
struct Registration {
    registry: Arc<ConnectionRegistry>,
    id: ConnectionId,
    peer: SocketAddr,
}

impl Drop for Registration {
    fn drop(&mut self) {
        match self.registry.unregister(self.id) {
            Ok(true) => info!("{} disconnects", self.peer),
            Ok(false) => debug!("{} was already unregistered", self.id),
            Err(e) => error!("Failed to unregister {}: {}", self.id, e),
        }
    }
}

/// Register the connection and drive it until the peer leaves.
pub fn run_session(
    socket: WebSocket<TcpStream>,
    id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
    dispatcher: CommandDispatcher,
) -> Result<()> {
    let stream = socket.get_ref();
    let peer = stream.peer_addr()?;
    stream.set_read_timeout(Some(POLL_INTERVAL))?;

    let (outbox, mailbox) = unbounded::<String>();
    let identity = registry.register(ConnectionHandle { id, peer, outbox })?;
    let registration = Registration {
        registry,
        id,
        peer,
    };
    info!(
        "{} connects as {} ({} online)",
        peer,
        identity,
        registration.registry.len().unwrap_or_default()
    );

    SessionLoop {
        socket,
        identity,
        mailbox,
        dispatcher,
    }
    .run()
}

struct SessionLoop {
    socket: WebSocket<TcpStream>,
    identity: String,
    mailbox: Receiver<String>,
    dispatcher: CommandDispatcher,
}

impl SessionLoop {
    fn run(mut self) -> Result<()> {
        loop {
            match self.flush_mailbox() {
                Err(RelayError::WebSocket(e)) if is_disconnect(&e) => {
                    debug!("{} went away while receiving: {}", self.identity, e);
                    return Ok(());
                }
                other => other?,
            }
            match self.socket.read() {
                Ok(Message::Text(text)) => {
                    self.dispatcher.dispatch(&self.identity, text.as_str());
                }
                Ok(Message::Close(frame)) => {
                    debug!("{} closes: {:?}", self.identity, frame);
                    // Sends the queued close reply, then reports the socket as closed.
                    if let Err(e) = self.socket.flush() {
                        debug!("{} close reply: {}", self.identity, e);
                    }
                    return Ok(());
                }
                Ok(_) => {}
                Err(tungstenite::Error::Io(e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(e) if is_disconnect(&e) => {
                    debug!("{} dropped the connection: {}", self.identity, e);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn flush_mailbox(&mut self) -> Result<()> {
        loop {
            match self.mailbox.try_recv() {
                Ok(message) => self.socket.send(Message::text(message))?,
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => {
                    return Err(RelayError::ChannelRecv(format!(
                        "mailbox of {} disconnected",
                        self.identity
                    )));
                }
            }
        }
    }
}

fn is_disconnect(e: &tungstenite::Error) -> bool {
    match e {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => true,
        tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
        tungstenite::Error::Io(e) => matches!(
            e.kind(),
            ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
                | ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}
