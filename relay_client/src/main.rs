//! Relay Client — a terminal client for the exchange relay.
//!
//! Two modes are available:
//! - `chat` connects to a running relay over WebSocket, sends every stdin line
//!   as a text frame and prints every broadcast it receives;
//! - `history` queries the provider archive directly and prints EUR/USD rates
//!   (plus any extra currencies) for the last few days as JSON.
//!
//! Usage example (CLI):
//! ```bash
//! relay_client chat --url ws://127.0.0.1:8080
//! relay_client history --days 3 --currency GBP --currency PLN
//! ```
#![warn(missing_docs)]
mod args;
mod chat;
mod history;

use crate::args::{Args, Mode};
use crate::chat::run_chat;
use crate::history::render_history;
use clap::Parser;
use log::info;
use relay_common::exchange::{ExchangeService, ProviderConfig};
use relay_common::http::HttpClient;
use relay_common::{RelayError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    match args.mode {
        Mode::Chat { url } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let shutdown = shutdown.clone();
                ctrlc::set_handler(move || {
                    info!("Ctrl+C received. Leaving the relay...");
                    shutdown.store(true, Ordering::SeqCst);
                })
                .map_err(|e| RelayError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
            }
            run_chat(&url, shutdown)
        }
        Mode::History {
            days,
            currencies,
            archive_url,
            timeout_secs,
        } => {
            let provider = ProviderConfig {
                archive_url,
                ..ProviderConfig::default()
            };
            let http = HttpClient::new(Duration::from_secs(timeout_secs))?;
            let service = ExchangeService::new(http, provider);
            println!("{}", render_history(&service, days, &currencies)?);
            Ok(())
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
