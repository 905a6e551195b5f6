//! Subgraph HTTP transport.
//!
//! Implements the [`subgraph::Transport`] trait by POSTing GraphQL documents
//! as `{"query": ..}` JSON and unwrapping the `{data, errors}` envelope of the
//! answer.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Timeouts, status handling, `Retry-After` parsing and
//! envelope decoding live here. The [`subgraph`] crate sees only
//! [`subgraph::Transport`] and [`subgraph::TransportError`].
//!
//! No retries are performed; [`subgraph::TransportError::retry_policy`] tells
//! callers whether a retry is worthwhile.

mod envelope;
mod transport;

pub use transport::{
    BuildError, HttpTransport, HttpTransportConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
};
