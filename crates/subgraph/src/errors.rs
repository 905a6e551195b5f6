//! Error and retry-policy types for the group index client.
//!
//! [`SubgraphError`] is the single error surfaced by [`crate::SubgraphClient`].
//! Failures raised by a [`crate::Transport`] implementation are described by
//! [`TransportError`] and wrapped unchanged.
//!
//! [`RetryPolicy`] lets callers decide whether re-issuing a failed read is
//! safe. The client itself never retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ParamKind;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// - `Retryable` errors: timeouts, connection failures, rate limiting, 5xx.
/// - `NonRetryable` errors: invalid parameters, unsupported networks,
///   undecodable bodies, GraphQL errors, unexpected response shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The read may be re-issued.
    Retryable {
        /// Minimum back-off before the next attempt, from `Retry-After` when
        /// the service sent one.
        after: Option<Duration>,
    },
    /// Re-issuing the same read will fail the same way.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures produced while executing a query document against an endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The endpoint could not be reached (connection refused, DNS, timeout).
    #[error("subgraph endpoint unreachable: {message}")]
    Unreachable {
        /// Underlying transport message.
        message: String,
    },

    /// The endpoint answered with a non-success HTTP status.
    #[error("subgraph returned HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Delay requested by a `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// The response body was not a valid GraphQL JSON envelope.
    #[error("invalid subgraph response body: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// The service executed the request and reported GraphQL errors.
    #[error("subgraph reported errors: {}", .messages.join("; "))]
    Graphql {
        /// Messages of every entry in the `errors` array.
        messages: Vec<String>,
    },
}

impl TransportError {
    /// Returns whether re-issuing the request could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Unreachable { .. } => RetryPolicy::Retryable { after: None },
            Self::Status {
                status,
                retry_after,
            } if *status == 429 || *status >= 500 => RetryPolicy::Retryable {
                after: *retry_after,
            },
            Self::Status { .. } | Self::Decode { .. } | Self::Graphql { .. } => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Errors surfaced by every [`crate::SubgraphClient`] operation.
///
/// A group that does not exist is not an error: single-group lookups return
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum SubgraphError {
    /// An input did not match its declared kind.
    ///
    /// Produced before any query is built.
    #[error("Parameter '{name}' must be {expected}")]
    InvalidParameter {
        /// Name of the offending parameter (e.g. `"filters.timestampGte"`).
        name: String,
        /// Kind the parameter was required to have.
        expected: ParamKind,
    },

    /// The network name has no known subgraph deployment.
    #[error("Network '{network}' is not supported")]
    UnsupportedNetwork {
        /// The name that failed to resolve.
        network: String,
    },

    /// The transport failed; surfaced unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with data that does not match the group schema.
    #[error("Unexpected response shape: {message}")]
    UnexpectedShape {
        /// Description of the mismatch.
        message: String,
    },
}

impl SubgraphError {
    /// Creates an [`SubgraphError::InvalidParameter`] for `name`.
    pub fn invalid_parameter(name: impl Into<String>, expected: ParamKind) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            expected,
        }
    }

    /// Returns whether the failed call may be re-issued.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport(e) => e.retry_policy(),
            _ => RetryPolicy::NonRetryable,
        }
    }
}
