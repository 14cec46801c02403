//! Interactive chat session with the relay.
//!
//! The socket is polled with a short read timeout so a single thread can both
//! forward queued input lines and print incoming broadcasts.
use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use log::{debug, error, info};
use relay_common::net::POLL_INTERVAL;
use relay_common::{RelayError, Result};
use std::io::{BufRead, ErrorKind, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Drives one WebSocket connection to the relay.
pub struct ChatClient<S: Read + Write> {
    socket: WebSocket<S>,
    input: Receiver<String>,
    shutdown: Arc<AtomicBool>,
    closing: bool,
}

impl<S: Read + Write> ChatClient<S> {
    /// Wrap a connected socket whose reads time out after a short interval.
    pub fn new(socket: WebSocket<S>, input: Receiver<String>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            socket,
            input,
            shutdown,
            closing: false,
        }
    }

    /// Run until the relay closes the connection. Every received text frame is
    /// passed to `on_message`. The connection is closed once `input` runs dry or
    /// `shutdown` is raised.
    pub fn run(mut self, mut on_message: impl FnMut(&str)) -> Result<()> {
        loop {
            if !self.closing {
                self.forward_input()?;
            }
            match self.socket.read() {
                Ok(Message::Text(text)) => on_message(text.as_str()),
                Ok(_) => {}
                Err(tungstenite::Error::Io(e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    info!("Relay connection closed");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn forward_input(&mut self) -> Result<()> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return self.close();
            }
            match self.input.try_recv() {
                Ok(line) => self.socket.send(Message::text(line))?,
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => return self.close(),
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        debug!("Closing relay connection");
        self.closing = true;
        self.socket.close(None)?;
        Ok(())
    }
}

/// Feed stdin lines into `tx` from a background thread until EOF.
pub fn spawn_stdin_reader(tx: Sender<String>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        debug!("Stdin reader stopping...");
    });
}

/// Connect to `url` and chat on stdin/stdout until the connection ends.
pub fn run_chat(url: &str, shutdown: Arc<AtomicBool>) -> Result<()> {
    info!("Connecting to relay at {}", url);
    let (socket, _) = tungstenite::connect(url)?;
    match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(POLL_INTERVAL))?,
        _ => {
            return Err(RelayError::Format(format!(
                "Unsupported relay transport for {}",
                url
            )));
        }
    }
    info!("Connected. Type a message, `exchange` or `exchange N`; Ctrl+D to leave.");

    let (tx, rx) = unbounded();
    spawn_stdin_reader(tx);
    ChatClient::new(socket, rx, shutdown).run(|message| println!("{}", message))
}
