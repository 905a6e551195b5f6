//! Response normalizer.
//!
//! Decodes the `data` object of a `groups` query into typed raw records and
//! reshapes them into [`Group`] values. The only reshaping is of the member
//! list: the service returns `[{ "identityCommitment": "5" }, ..]`, callers
//! get `["5", ..]`. Every other field is carried over unchanged.

use serde::Deserialize;
use serde_json::Value;

use crate::{Group, GroupId, GroupOptions, MerkleTree, SubgraphError, VerifiedProof};

/// The `data` object of a `groups` query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawGroupsResponse {
    pub groups: Vec<RawGroup>,
}

/// A group record exactly as the service returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    pub id: GroupId,
    pub merkle_tree: MerkleTree,
    pub admin: String,
    #[serde(default)]
    pub members: Option<Vec<RawMember>>,
    #[serde(default)]
    pub verified_proofs: Option<Vec<VerifiedProof>>,
}

/// Wrapper record around a single member identifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    pub identity_commitment: String,
}

/// `data` of an id-only query.
#[derive(Debug, Deserialize)]
struct RawIdsResponse {
    groups: Vec<RawId>,
}

#[derive(Debug, Deserialize)]
struct RawId {
    id: GroupId,
}

// ---------------------------------------------------------------------------

/// Decodes the `data` object of a group query.
///
/// # Errors
///
/// [`SubgraphError::UnexpectedShape`] if `data` does not match the group
/// schema (e.g. a member record without `identityCommitment`).
pub fn decode_groups(data: Value) -> Result<RawGroupsResponse, SubgraphError> {
    serde_json::from_value(data).map_err(unexpected_shape)
}

/// Decodes the `data` object of [`crate::GroupQuery::ids`] or
/// [`crate::GroupQuery::membership`].
pub fn decode_group_ids(data: Value) -> Result<Vec<GroupId>, SubgraphError> {
    let raw: RawIdsResponse = serde_json::from_value(data).map_err(unexpected_shape)?;
    Ok(raw.groups.into_iter().map(|g| g.id).collect())
}

/// Reshapes one raw record.
///
/// Only `members` is reshaped: when requested it must be present and is
/// unwrapped to bare identifiers, otherwise it is dropped. Every other field,
/// `verifiedProofs` included, is carried over as received.
pub fn normalize_group(raw: RawGroup, options: &GroupOptions) -> Result<Group, SubgraphError> {
    let members = if options.members {
        let wrapped = raw
            .members
            .ok_or_else(|| missing_list(&raw.id, "members"))?;
        Some(wrapped.into_iter().map(|m| m.identity_commitment).collect())
    } else {
        None
    };

    Ok(Group {
        id: raw.id,
        merkle_tree: raw.merkle_tree,
        admin: raw.admin,
        members,
        verified_proofs: raw.verified_proofs,
    })
}

/// Reshapes every record, preserving the service's order.
pub fn normalize_groups(
    raw: RawGroupsResponse,
    options: &GroupOptions,
) -> Result<Vec<Group>, SubgraphError> {
    raw.groups
        .into_iter()
        .map(|g| normalize_group(g, options))
        .collect()
}

/// Reshapes the first record, or returns `None` if there is none.
pub fn normalize_single(
    raw: RawGroupsResponse,
    options: &GroupOptions,
) -> Result<Option<Group>, SubgraphError> {
    raw.groups
        .into_iter()
        .next()
        .map(|g| normalize_group(g, options))
        .transpose()
}

fn unexpected_shape(e: serde_json::Error) -> SubgraphError {
    SubgraphError::UnexpectedShape {
        message: e.to_string(),
    }
}

fn missing_list(id: &GroupId, field: &str) -> SubgraphError {
    SubgraphError::UnexpectedShape {
        message: format!("group {id} has no '{field}' list although it was requested"),
    }
}
