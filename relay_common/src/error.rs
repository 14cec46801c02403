//! Error types shared between the relay server and client.
//!
//! The `RelayError` enum unifies the failure cases of the provider HTTP calls,
//! the WebSocket transport, serialization, channels and shared state, allowing
//! every crate to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by server and client.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The provider could not be reached (DNS, refused connection, bad URL, timeout).
    #[error("Connection error: {url}: {source}")]
    RemoteConnection {
        /// Requested URL.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a status other than 200.
    #[error("Error status: {status} for {url}")]
    RemoteStatus {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The provider body is not JSON or lacks the expected fields.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WebSocket protocol or transport failure after the handshake.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// WebSocket opening handshake failed.
    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),
}

impl<T> From<PoisonError<T>> for RelayError {
    fn from(err: PoisonError<T>) -> Self {
        RelayError::MutexLock(err.to_string())
    }
}
