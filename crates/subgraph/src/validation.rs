//! Runtime kind checks for loosely-typed inputs.
//!
//! Options arriving as JSON (from a config file, an RPC payload, a script)
//! are checked here once and turned into typed values; nothing downstream of
//! [`crate::GroupOptions`] re-checks them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SubgraphError, Timestamp};

/// Kind a parameter is required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    NonEmptyString,
    Boolean,
    Object,
    /// A string holding an RFC 3339 date-time or a `YYYY-MM-DD` date.
    DateTime,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::String => "a string",
            Self::NonEmptyString => "a non-empty string",
            Self::Boolean => "a boolean",
            Self::Object => "an object",
            Self::DateTime => "a date (RFC 3339 or YYYY-MM-DD)",
        };
        f.write_str(text)
    }
}

/// Fails with [`SubgraphError::InvalidParameter`] unless `value` has `kind`.
pub fn expect_kind(value: &Value, name: &str, kind: ParamKind) -> Result<(), SubgraphError> {
    let matches = match kind {
        ParamKind::String => value.is_string(),
        ParamKind::NonEmptyString => value.as_str().is_some_and(|s| !s.is_empty()),
        ParamKind::Boolean => value.is_boolean(),
        ParamKind::Object => value.is_object(),
        ParamKind::DateTime => value.as_str().and_then(Timestamp::parse).is_some(),
    };
    if matches {
        Ok(())
    } else {
        Err(SubgraphError::invalid_parameter(name, kind))
    }
}

/// Checks a caller-supplied string is non-empty.
pub fn expect_non_empty<'a>(value: &'a str, name: &str) -> Result<&'a str, SubgraphError> {
    if value.is_empty() {
        Err(SubgraphError::invalid_parameter(name, ParamKind::NonEmptyString))
    } else {
        Ok(value)
    }
}
