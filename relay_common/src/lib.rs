//!
//! Common types and utilities shared by the relay server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `RelayError` used across the workspace.
//! - `result` — handy `Result<T, RelayError>` alias.
//! - `command` — grammar of the text frames a client sends to the relay.
//! - `currency` — currency codes understood by the exchange-rate provider.
//! - `net` — networking defaults and small helpers.
//! - `http` — blocking JSON-over-HTTP adapter.
//! - `exchange` — live and historical exchange snapshots built on top of `http`.
#![warn(missing_docs)]
pub mod command;
pub mod currency;
pub mod error;
pub mod exchange;
pub mod http;
pub mod net;
pub mod result;

pub use command::Command;
pub use error::RelayError;
pub use result::Result;
