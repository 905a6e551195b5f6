//! Group entities as returned to callers.
//!
//! Unlike the raw records in [`crate::normalize`], these types have a fixed
//! schema: the member list is always a list of bare identity commitments and
//! optional lists are either present or absent, never defaulted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::GroupId;

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// Summary of a group's Merkle tree accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleTree {
    /// Current root, as a decimal string. `None` until the first leaf is
    /// inserted; serialized as `null`.
    pub root: Option<String>,
    /// Tree depth.
    pub depth: u32,
    /// Value of an empty leaf, as a decimal string.
    pub zero_value: String,
    /// Number of leaves inserted so far.
    pub number_of_leaves: u64,
}

// ---------------------------------------------------------------------------

/// A zero-knowledge membership proof that was verified on-chain for a group.
///
/// All values are kept as the decimal strings the service returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedProof {
    pub signal: String,
    pub merkle_tree_root: String,
    pub external_nullifier: String,
    pub nullifier_hash: String,
    /// Block timestamp (seconds since the Unix epoch) of the verification.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------

/// A group as seen by callers.
///
/// `members` is `Some` exactly when members were requested, ordered by
/// insertion index. `verified_proofs` is whatever the service sent, ordered by
/// timestamp when proofs were requested. Absent lists are omitted on
/// serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub merkle_tree: MerkleTree,
    /// Administrator address.
    pub admin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_proofs: Option<Vec<VerifiedProof>>,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp used in group filters.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 date-time or a bare `YYYY-MM-DD` date.
    ///
    /// Bare dates are taken as midnight UTC. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Self(dt.and_utc()))
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Encodes the timestamp as the date literal the subgraph expects in
    /// filter arguments: `YYYY-MM-DD` in UTC.
    pub fn to_graphql_date(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2023-04-05", "2023-04-05")]
    #[case("2023-04-05T23:30:00Z", "2023-04-05")]
    #[case("2023-04-05T23:30:00-02:00", "2023-04-06")]
    #[case("1999-12-31T00:00:00+00:00", "1999-12-31")]
    fn test_graphql_date_is_utc_calendar_day(#[case] input: &str, #[case] expected: &str) {
        let ts = Timestamp::parse(input).unwrap();
        assert_eq!(ts.to_graphql_date(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2023-13-01")]
    #[case("2023/04/05")]
    fn test_unparseable_timestamps(#[case] input: &str) {
        assert!(Timestamp::parse(input).is_none());
    }

    #[test]
    fn test_group_without_lists_serializes_without_them() {
        let group = Group {
            id: GroupId::new("1").unwrap(),
            merkle_tree: MerkleTree {
                root: None,
                depth: 20,
                zero_value: "0".into(),
                number_of_leaves: 0,
            },
            admin: "0xabc".into(),
            members: None,
            verified_proofs: None,
        };

        let value = serde_json::to_value(&group).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("members"));
        assert!(!object.contains_key("verifiedProofs"));
        assert_eq!(value["merkleTree"]["numberOfLeaves"], 0);
        assert!(value["merkleTree"]["root"].is_null());
    }
}
