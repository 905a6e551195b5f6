//! reqwest implementation of [`subgraph::Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use subgraph::{Endpoint, Transport, TransportError};
use thiserror::Error;
use tracing::debug;

use crate::envelope::{extract_data, QueryBody};

/// Default timeout for a whole query round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTransportConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// The HTTP client could not be constructed (e.g. no TLS backend).
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct BuildError(#[from] reqwest::Error);

/// POSTs GraphQL documents to subgraph endpoints.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with default timeouts.
    pub fn new() -> Result<Self, BuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Creates a transport with custom timeouts.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, BuildError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, endpoint: &Endpoint, query: &str) -> Result<Value, TransportError> {
        let response = self
            .http_client
            .post(endpoint.as_str())
            .json(&QueryBody { query })
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                retry_after: retry_after(response.headers()),
            });
        }

        let body = response.bytes().await.map_err(map_request_error)?;
        debug!(bytes = body.len(), "received subgraph response");
        extract_data(&body)
    }
}

fn map_request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Unreachable {
            message: format!("request timed out: {e}"),
        }
    } else if e.is_connect() {
        TransportError::Unreachable {
            message: format!("connection failed: {e}"),
        }
    } else {
        TransportError::Unreachable {
            message: format!("request failed: {e}"),
        }
    }
}

/// Reads a `Retry-After` header given in delay-seconds form.
///
/// HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
