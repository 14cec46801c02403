//! Domain models of the relay server.
//!
//! - `session` — connection handles and the per-client `Session` record kept by the registry.
//! - `names` — display-name generator for anonymous clients.

pub mod names;
pub mod session;
