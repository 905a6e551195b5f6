//! Read-only client domain for a group-membership subgraph.
//!
//! This crate turns a small set of typed options into a GraphQL read over the
//! `groups` entity and turns the service's answer into [`Group`] values whose
//! shape depends only on the options, never on the wire format.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines the [`Transport`] port; infrastructure crates supply an
//! implementation (see the `http-transport` crate).
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`GroupId`, `Endpoint`, `RequestId`) |
//! | [`types`] | Output entities (`Group`, `MerkleTree`, `VerifiedProof`) and `Timestamp` |
//! | [`options`] | Typed query options and filter precedence |
//! | [`validation`] | Kind checks for loosely-typed inputs |
//! | [`network`] | Network names and their subgraph endpoints |
//! | [`query`] | Query model and renderer |
//! | [`normalize`] | Raw response schema and reshaping |
//! | [`ports`] | The [`Transport`] trait |
//! | [`client`] | [`SubgraphClient`], the public read API |
//! | [`errors`] | Error and retry-policy types |
//!
//! ## Example
//!
//! ```ignore
//! let client = SubgraphClient::new("sepolia", HttpTransport::new()?)?;
//! let groups = client
//!     .get_groups(&GroupOptions::new().with_members())
//!     .await?;
//! ```

pub mod client;
pub mod errors;
pub mod identifiers;
pub mod network;
pub mod normalize;
pub mod options;
pub mod ports;
pub mod query;
pub mod types;
pub mod validation;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::SubgraphClient;
pub use errors::{RetryPolicy, SubgraphError, TransportError};
pub use identifiers::{Endpoint, GroupId, RequestId};
pub use network::{resolve_endpoint, Network};
pub use options::{GroupFilters, GroupOptions, TimeBound};
pub use ports::Transport;
pub use query::GroupQuery;
pub use types::{Group, MerkleTree, Timestamp, VerifiedProof};
pub use validation::ParamKind;
