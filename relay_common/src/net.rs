//! Shared networking defaults and helpers used by server and client.
use std::time::Duration;

/// Interface the relay binds to unless told otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// WebSocket port of the relay.
pub const DEFAULT_PORT: u16 = 8080;
/// Endpoint with the current exchange rates.
pub const LIVE_RATES_URL: &str = "https://api.privatbank.ua/p24api/pubinfo?exchange&coursid=5";
/// Endpoint with the archived rates of a single day (`?date=DD.MM.YYYY`).
pub const ARCHIVE_RATES_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";
/// Upper bound for a single provider request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// How long an accepted connection may take to complete the WebSocket handshake.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
/// How long a session waits for an inbound frame before flushing its mailbox again.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// WebSocket URL of a relay listening on `ip:port`.
pub fn ws_url(ip: &str, port: u16) -> String {
    format!("ws://{}", addr(ip, port))
}
