//! Port traits implemented by infrastructure crates.

use async_trait::async_trait;
use serde_json::Value;

use crate::{Endpoint, TransportError};

/// Executes a GraphQL query document against a subgraph endpoint.
///
/// Implementations return the decoded `data` object of the GraphQL response.
/// They must not retry; failures are reported as [`TransportError`] and
/// surfaced to the caller unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, endpoint: &Endpoint, query: &str) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, endpoint: &Endpoint, query: &str) -> Result<Value, TransportError> {
        (**self).execute(endpoint, query).await
    }
}
