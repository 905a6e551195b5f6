//! End-to-end tests of `SubgraphClient` against a scripted in-memory transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use subgraph::{
    Endpoint, GroupFilters, GroupOptions, ParamKind, RetryPolicy, SubgraphClient, SubgraphError,
    Timestamp, Transport, TransportError,
};

/// Returns a fixed answer and records every query it is asked to execute.
#[derive(Clone)]
struct ScriptedTransport {
    answer: Result<Value, TransportError>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    fn answering(data: Value) -> Self {
        Self {
            answer: Ok(data),
            calls: Arc::default(),
        }
    }

    fn failing(error: TransportError) -> Self {
        Self {
            answer: Err(error),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn only_query(&self) -> String {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one transport call");
        calls[0].1.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, endpoint: &Endpoint, query: &str) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), query.to_string()));
        self.answer.clone()
    }
}

fn group(id: &str, members: &[&str]) -> Value {
    json!({
        "id": id,
        "merkleTree": {
            "root": format!("root-{id}"),
            "depth": 20,
            "zeroValue": "0",
            "numberOfLeaves": members.len()
        },
        "admin": "0xabc",
        "members": members
            .iter()
            .map(|m| json!({ "identityCommitment": m }))
            .collect::<Vec<_>>()
    })
}

fn client(transport: ScriptedTransport) -> SubgraphClient<ScriptedTransport> {
    SubgraphClient::new("sepolia", transport).unwrap()
}

#[tokio::test]
async fn test_get_groups_with_members_and_admin_filter() {
    let transport = ScriptedTransport::answering(json!({
        "groups": [group("1", &["5", "9"]), group("2", &["7", "3"])]
    }));
    let client = client(transport.clone());
    let options = GroupOptions::new().with_members().with_filters(GroupFilters {
        admin: Some("0xabc".into()),
        ..Default::default()
    });

    let groups = client.get_groups(&options).await.unwrap();

    let query = transport.only_query();
    assert!(query.contains(r#"groups(where: { admin: "0xabc" }) {"#), "{query}");
    assert!(
        query.contains("members(orderBy: index) {\n      identityCommitment\n    }"),
        "{query}"
    );
    assert!(!query.contains("verifiedProofs"));

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members, Some(vec!["5".to_string(), "9".to_string()]));
    assert_eq!(groups[1].members, Some(vec!["7".to_string(), "3".to_string()]));
    assert_eq!(groups[1].merkle_tree.root.as_deref(), Some("root-2"));
}

#[tokio::test]
async fn test_get_groups_queries_the_resolved_endpoint() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    let client = client(transport.clone());

    let groups = client.get_groups(&GroupOptions::default()).await.unwrap();

    assert!(groups.is_empty());
    let calls = transport.calls();
    assert_eq!(
        calls[0].0,
        "https://api.studio.thegraph.com/query/14377/semaphore-sepolia/v3.6.1"
    );
    assert!(!calls[0].1.contains("where"));
}

#[tokio::test]
async fn test_get_groups_time_filter_uses_highest_precedence() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    let client = client(transport.clone());
    let options = GroupOptions::new().with_filters(GroupFilters {
        admin: None,
        timestamp: None,
        timestamp_gte: Timestamp::parse("2023-05-01"),
        timestamp_lte: Timestamp::parse("2023-06-01"),
    });

    client.get_groups(&options).await.unwrap();

    let query = transport.only_query();
    assert!(query.contains(r#"groups(where: { timestamp_gte: "2023-05-01" }) {"#), "{query}");
    assert!(!query.contains("2023-06-01"));
}

#[tokio::test]
async fn test_get_group_returns_single_value() {
    let transport = ScriptedTransport::answering(json!({ "groups": [group("42", &["1"])] }));
    let client = client(transport.clone());

    let found = client
        .get_group("42", &GroupOptions::new().with_members())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id.as_str(), "42");
    assert_eq!(found.members, Some(vec!["1".to_string()]));
    assert!(transport.only_query().contains(r#"groups(where: { id: "42" }) {"#));
}

#[tokio::test]
async fn test_get_group_without_members_has_no_member_field() {
    let transport = ScriptedTransport::answering(json!({
        "groups": [{
            "id": "42",
            "merkleTree": { "root": "1", "depth": 16, "zeroValue": "0", "numberOfLeaves": 0 },
            "admin": "0xdef"
        }]
    }));
    let client = client(transport);

    let found = client
        .get_group("42", &GroupOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.members, None);
    assert!(serde_json::to_value(&found).unwrap().get("members").is_none());
}

#[tokio::test]
async fn test_get_group_missing_is_none() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    let client = client(transport);

    let found = client
        .get_group("missing-id", &GroupOptions::default())
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_group_rejects_empty_id_before_any_call() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    let client = client(transport.clone());

    let err = client
        .get_group("", &GroupOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SubgraphError::InvalidParameter { ref name, expected: ParamKind::NonEmptyString } if name == "groupId"
    ));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_transport_errors_propagate_unchanged() {
    let transport = ScriptedTransport::failing(TransportError::Status {
        status: 503,
        retry_after: None,
    });
    let client = client(transport);

    let err = client.get_groups(&GroupOptions::default()).await.unwrap_err();

    match &err {
        SubgraphError::Transport(TransportError::Status { status, .. }) => assert_eq!(*status, 503),
        other => panic!("expected transport status error, got {other:?}"),
    }
    assert_eq!(err.retry_policy(), RetryPolicy::Retryable { after: None });
}

#[tokio::test]
async fn test_malformed_member_records_surface_as_unexpected_shape() {
    let transport = ScriptedTransport::answering(json!({
        "groups": [{
            "id": "1",
            "merkleTree": { "root": "1", "depth": 16, "zeroValue": "0", "numberOfLeaves": 1 },
            "admin": "0xabc",
            "members": [{ "index": 0 }]
        }]
    }));
    let client = client(transport);

    let err = client
        .get_groups(&GroupOptions::new().with_members())
        .await
        .unwrap_err();

    assert!(matches!(err, SubgraphError::UnexpectedShape { .. }));
}

#[tokio::test]
async fn test_get_group_ids() {
    let transport = ScriptedTransport::answering(json!({ "groups": [{ "id": "1" }, { "id": "2" }] }));
    let client = client(transport.clone());

    let ids = client.get_group_ids().await.unwrap();

    let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(transport.only_query(), "query {\n  groups {\n    id\n  }\n}\n");
}

#[tokio::test]
async fn test_is_group_member() {
    let present = ScriptedTransport::answering(json!({ "groups": [{ "id": "3" }] }));
    assert!(client(present.clone()).is_group_member("3", "77").await.unwrap());
    assert!(present
        .only_query()
        .contains(r#"members_: { identityCommitment: "77" }"#));

    let absent = ScriptedTransport::answering(json!({ "groups": [] }));
    assert!(!client(absent).is_group_member("3", "78").await.unwrap());
}

#[tokio::test]
async fn test_is_group_member_rejects_empty_member() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    let err = client(transport.clone())
        .is_group_member("3", "")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Parameter 'member' must be a non-empty string");
    assert!(transport.calls().is_empty());
}

#[test]
fn test_unknown_network_is_rejected() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    match SubgraphClient::new("mainnet", transport) {
        Err(SubgraphError::UnsupportedNetwork { network }) => assert_eq!(network, "mainnet"),
        Err(other) => panic!("expected UnsupportedNetwork, got {other:?}"),
        Ok(_) => panic!("expected UnsupportedNetwork, got a client"),
    }
}

#[tokio::test]
async fn test_options_from_json_drive_the_query() {
    let transport = ScriptedTransport::answering(json!({ "groups": [] }));
    let client = client(transport.clone());
    let options = GroupOptions::from_json(&json!({
        "verifiedProofs": true,
        "filters": { "timestamp": "2022-11-03T10:00:00Z", "timestampLte": "2023-01-01" }
    }))
    .unwrap();

    client.get_groups(&options).await.unwrap();

    let query = transport.only_query();
    assert!(query.contains(r#"groups(where: { timestamp: "2022-11-03" }) {"#), "{query}");
    assert!(query.contains("verifiedProofs(orderBy: timestamp)"));
    assert!(!query.contains("members"));
}
