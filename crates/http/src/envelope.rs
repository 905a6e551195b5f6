//! GraphQL response envelope decoding.
//!
//! Every GraphQL-over-HTTP answer has the form `{ "data": .., "errors": [..] }`.
//! A non-empty `errors` array wins over any partial `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use subgraph::TransportError;

/// Request body of a GraphQL POST.
#[derive(Debug, Serialize)]
pub(crate) struct QueryBody<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<ErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Extracts the `data` object from a raw response body.
pub(crate) fn extract_data(body: &[u8]) -> Result<Value, TransportError> {
    let envelope: Envelope = serde_json::from_slice(body).map_err(|e| TransportError::Decode {
        message: format!("failed to parse GraphQL response: {e}"),
    })?;

    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        return Err(TransportError::Graphql {
            messages: errors.into_iter().map(|e| e.message).collect(),
        });
    }

    match envelope.data {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(TransportError::Decode {
            message: "GraphQL response has no data".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_is_returned() {
        let body = br#"{"data":{"groups":[{"id":"1"}]}}"#;
        assert_eq!(extract_data(body).unwrap(), json!({ "groups": [{ "id": "1" }] }));
    }

    #[test]
    fn test_errors_win_over_partial_data() {
        let body = br#"{"data":{"groups":[]},"errors":[{"message":"indexer behind"},{"message":"bad field","locations":[]}]}"#;
        assert_eq!(
            extract_data(body).unwrap_err(),
            TransportError::Graphql {
                messages: vec!["indexer behind".into(), "bad field".into()]
            }
        );
    }

    #[test]
    fn test_empty_errors_array_is_ignored() {
        let body = br#"{"data":{"groups":[]},"errors":[]}"#;
        assert_eq!(extract_data(body).unwrap(), json!({ "groups": [] }));
    }

    #[test]
    fn test_missing_or_null_data_is_decode_error() {
        for body in [&br#"{}"#[..], &br#"{"data":null}"#[..]] {
            assert!(matches!(extract_data(body), Err(TransportError::Decode { .. })));
        }
    }

    #[test]
    fn test_non_json_body_is_decode_error() {
        let err = extract_data(b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn test_query_body_shape() {
        let body = serde_json::to_value(QueryBody { query: "query { groups { id } }" }).unwrap();
        assert_eq!(body, json!({ "query": "query { groups { id } }" }));
    }
}
