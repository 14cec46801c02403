//! Command-line arguments for the relay server.
use clap::Parser;
use relay_common::net::{
    ARCHIVE_RATES_URL, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, LIVE_RATES_URL,
};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Interface to listen on.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// WebSocket port.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Provider endpoint with the current rates.
    #[clap(long, default_value = LIVE_RATES_URL)]
    pub live_url: String,

    /// Provider endpoint with archived rates; `?date=DD.MM.YYYY` is appended.
    #[clap(long, default_value = ARCHIVE_RATES_URL)]
    pub archive_url: String,

    /// Timeout of a single provider request, in seconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}
