//! Exchange relay server.
//!
//! Clients connect over WebSocket, chat with each other and ask for exchange
//! rates that are fetched from the provider API and broadcast to everybody.
//! The binary wires together the following building blocks:
//!
//! - `RelayListener` — accepts TCP connections, performs the WebSocket
//!   handshake and spawns one session thread per client.
//! - `ConnectionRegistry` — the set of connected sessions, the only state shared
//!   between threads, guarded by a mutex.
//! - `BroadcastRelay` — pushes a message into the mailbox of every registered
//!   session; a dead mailbox is skipped without affecting the others.
//! - `CommandDispatcher` — classifies each inbound text frame (`exchange`,
//!   `exchange N`, or chat) and broadcasts the outcome.
//! - `ExchangeService` — builds live and historical snapshots from the provider.
//!
//! Errors inside one session are logged and end only that session; provider
//! failures are logged and produce no broadcast.
#![warn(missing_docs)]
use crate::args::Args;
use crate::listener::RelayListener;
use crate::model::names::RandomNames;
use crate::registry::ConnectionRegistry;
use crate::relay::BroadcastRelay;
use crate::session::CommandDispatcher;
use clap::Parser;
use log::info;
use relay_common::Result;
use relay_common::exchange::{ExchangeService, ProviderConfig};
use relay_common::http::HttpClient;
use relay_common::net::addr;
use std::sync::Arc;
use std::time::Duration;

mod args;
mod listener;
pub mod model;
mod registry;
mod relay;
mod session;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let provider = ProviderConfig {
        live_url: args.live_url,
        archive_url: args.archive_url,
    };
    info!("Exchange provider: {:?}", provider);
    let http = HttpClient::new(Duration::from_secs(args.timeout_secs))?;
    let exchange = Arc::new(ExchangeService::new(http, provider));

    let registry = Arc::new(ConnectionRegistry::new(RandomNames));
    let dispatcher = CommandDispatcher::new(BroadcastRelay::new(Arc::clone(&registry)), exchange);

    let listener = RelayListener::bind(&addr(&args.host, args.port))?;
    listener.serve(registry, dispatcher)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
