//! Typed query options.
//!
//! [`GroupOptions`] decides which sub-selections a group query carries;
//! [`GroupFilters`] restricts which groups the collection query returns.
//! Both default to "nothing extra": no members, no proofs, no filter.

use serde_json::{Map, Value};

use crate::validation::{expect_kind, ParamKind};
use crate::{SubgraphError, Timestamp};

/// What to fetch alongside each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOptions {
    /// Include the member list, ordered by insertion index. Default `false`.
    pub members: bool,
    /// Include verified proofs, ordered by timestamp. Default `false`.
    pub verified_proofs: bool,
    /// Restricts the collection query. Ignored by single-group lookups.
    pub filters: Option<GroupFilters>,
}

impl GroupOptions {
    /// Options requesting only the base group fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the member list.
    pub fn with_members(mut self) -> Self {
        self.members = true;
        self
    }

    /// Requests verified proofs.
    pub fn with_verified_proofs(mut self) -> Self {
        self.verified_proofs = true;
        self
    }

    /// Sets the collection filters.
    pub fn with_filters(mut self, filters: GroupFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Validates a loosely-typed JSON option bag and converts it.
    ///
    /// Accepted keys mirror the service's field names: `members`,
    /// `verifiedProofs`, `filters.admin`, `filters.timestamp`,
    /// `filters.timestampGte`, `filters.timestampLte`. Unknown keys are
    /// ignored. A key that is present must have the right kind; `null` is
    /// rejected like any other wrong kind.
    ///
    /// # Errors
    ///
    /// [`SubgraphError::InvalidParameter`] naming the first offending key.
    pub fn from_json(value: &Value) -> Result<Self, SubgraphError> {
        let object = value
            .as_object()
            .ok_or_else(|| SubgraphError::invalid_parameter("options", ParamKind::Object))?;

        let members = optional_bool(object, "members")?;
        let verified_proofs = optional_bool(object, "verifiedProofs")?;

        let filters = match object.get("filters") {
            None => None,
            Some(raw) => {
                let filters = raw
                    .as_object()
                    .ok_or_else(|| SubgraphError::invalid_parameter("filters", ParamKind::Object))?;
                Some(GroupFilters::from_json_object(filters)?)
            }
        };

        Ok(Self {
            members,
            verified_proofs,
            filters,
        })
    }
}

// ---------------------------------------------------------------------------

/// Predicates for the collection query.
///
/// `admin` always applies when set. Of the three timestamp fields at most one
/// applies; see [`GroupFilters::time_bound`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilters {
    /// Exact administrator address.
    pub admin: Option<String>,
    /// Exact creation time.
    pub timestamp: Option<Timestamp>,
    /// Inclusive lower bound on creation time.
    pub timestamp_gte: Option<Timestamp>,
    /// Inclusive upper bound on creation time.
    pub timestamp_lte: Option<Timestamp>,
}

/// The single time predicate a [`GroupFilters`] contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    Exact(Timestamp),
    AtLeast(Timestamp),
    AtMost(Timestamp),
}

impl GroupFilters {
    /// Returns the time predicate that applies.
    ///
    /// `timestamp` wins over `timestamp_gte`, which wins over `timestamp_lte`.
    pub fn time_bound(&self) -> Option<TimeBound> {
        self.timestamp
            .map(TimeBound::Exact)
            .or(self.timestamp_gte.map(TimeBound::AtLeast))
            .or(self.timestamp_lte.map(TimeBound::AtMost))
    }

    /// Returns `true` if no field would produce a predicate.
    pub fn is_empty(&self) -> bool {
        self.admin.is_none() && self.time_bound().is_none()
    }

    fn from_json_object(object: &Map<String, Value>) -> Result<Self, SubgraphError> {
        let admin = match object.get("admin") {
            None => None,
            Some(raw) => {
                expect_kind(raw, "filters.admin", ParamKind::String)?;
                raw.as_str().map(str::to_owned)
            }
        };

        Ok(Self {
            admin,
            timestamp: optional_timestamp(object, "timestamp")?,
            timestamp_gte: optional_timestamp(object, "timestampGte")?,
            timestamp_lte: optional_timestamp(object, "timestampLte")?,
        })
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn optional_bool(object: &Map<String, Value>, key: &str) -> Result<bool, SubgraphError> {
    match object.get(key) {
        None => Ok(false),
        Some(raw) => {
            expect_kind(raw, key, ParamKind::Boolean)?;
            Ok(raw.as_bool().unwrap_or_default())
        }
    }
}

fn optional_timestamp(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<Timestamp>, SubgraphError> {
    let Some(raw) = object.get(key) else {
        return Ok(None);
    };
    let name = format!("filters.{key}");
    raw.as_str()
        .and_then(Timestamp::parse)
        .map(Some)
        .ok_or_else(|| SubgraphError::invalid_parameter(name, ParamKind::DateTime))
}
