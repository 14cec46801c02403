//! Command-line arguments for the relay client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use relay_common::currency::Currency;
use relay_common::net::{
    ARCHIVE_RATES_URL, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, ws_url,
};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// What to do.
    #[command(subcommand)]
    pub mode: Mode,
}

/// Client modes.
#[derive(Debug, Subcommand)]
pub enum Mode {
    /// Join a relay: stdin lines are sent, broadcasts are printed.
    Chat {
        /// WebSocket URL of the relay.
        #[clap(long, default_value_t = ws_url(DEFAULT_HOST, DEFAULT_PORT))]
        url: String,
    },
    /// Print archived EUR/USD rates (plus extra currencies) for the last days.
    History {
        /// Number of days before today, at most 10.
        #[clap(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        days: u8,

        /// Extra currency to include; may be repeated.
        #[clap(long = "currency", value_enum, ignore_case = true)]
        currencies: Vec<Currency>,

        /// Provider endpoint with archived rates; `?date=DD.MM.YYYY` is appended.
        #[clap(long, default_value = ARCHIVE_RATES_URL)]
        archive_url: String,

        /// Timeout of a single provider request, in seconds.
        #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
}
