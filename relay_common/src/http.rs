//! Blocking JSON-over-HTTP adapter used to talk to the exchange-rate provider.
//!
//! `FetchJson` is the seam between the snapshot service and the network: the
//! production `HttpClient` performs a real GET request, tests plug in a fake.
//! Failures are classified into `RelayError::RemoteConnection`,
//! `RelayError::RemoteStatus` and `RelayError::MalformedResponse`. No retries
//! happen at this layer.
use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::RelayError;

/// Source of decoded JSON documents addressed by URL.
pub trait FetchJson: Send + Sync {
    /// Performs a single GET against `url` and decodes the body as JSON.
    fn fetch_json(&self, url: &str) -> Result<Value, RelayError>;
}

/// `reqwest`-backed implementation of [`FetchJson`].
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Format(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl FetchJson for HttpClient {
    fn fetch_json(&self, url: &str) -> Result<Value, RelayError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| RelayError::RemoteConnection {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RelayError::RemoteStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<Value>()
            .map_err(|e| RelayError::MalformedResponse(format!("{}: {}", url, e)))
    }
}
