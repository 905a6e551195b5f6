//! Command-line and environment configuration.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use http_transport::HttpTransportConfig;
use subgraph::{
    resolve_endpoint, Endpoint, GroupFilters, GroupOptions, ParamKind, SubgraphError, Timestamp,
};

use crate::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "groups-query",
    about = "Read groups from a group-membership subgraph"
)]
pub struct Cli {
    /// Network whose subgraph deployment to query (e.g. "sepolia", "arbitrum").
    #[arg(long, default_value = "sepolia", env = "GROUPS_NETWORK")]
    pub network: String,

    /// Explicit subgraph endpoint URL; overrides --network.
    #[arg(long, env = "GROUPS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "GROUPS_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Human, env = "GROUPS_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 10, env = "GROUPS_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the ids of every group.
    Ids,
    /// List groups, optionally filtered.
    Groups(GroupsArgs),
    /// Show one group; prints `null` if it does not exist.
    Group {
        /// Group id.
        id: String,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// Check whether an identity commitment is a member of a group.
    IsMember {
        /// Group id.
        group_id: String,
        /// Identity commitment.
        member: String,
    },
    /// Print the query `groups` would send, without sending it.
    Query(GroupsArgs),
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct IncludeArgs {
    /// Include member identity commitments.
    #[arg(long)]
    pub members: bool,

    /// Include verified proofs.
    #[arg(long)]
    pub verified_proofs: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GroupsArgs {
    #[command(flatten)]
    pub include: IncludeArgs,

    /// Only groups administered by this address.
    #[arg(long)]
    pub admin: Option<String>,

    /// Only groups created on this date (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_parser = parse_timestamp)]
    pub timestamp: Option<Timestamp>,

    /// Only groups created on or after this date; ignored with --timestamp.
    #[arg(long, value_parser = parse_timestamp)]
    pub timestamp_gte: Option<Timestamp>,

    /// Only groups created on or before this date; ignored with --timestamp or --timestamp-gte.
    #[arg(long, value_parser = parse_timestamp)]
    pub timestamp_lte: Option<Timestamp>,
}

impl IncludeArgs {
    pub fn to_options(self) -> GroupOptions {
        GroupOptions {
            members: self.members,
            verified_proofs: self.verified_proofs,
            filters: None,
        }
    }
}

impl GroupsArgs {
    pub fn to_options(&self) -> GroupOptions {
        let filters = GroupFilters {
            admin: self.admin.clone(),
            timestamp: self.timestamp,
            timestamp_gte: self.timestamp_gte,
            timestamp_lte: self.timestamp_lte,
        };
        GroupOptions {
            filters: (!filters.is_empty()).then_some(filters),
            ..self.include.to_options()
        }
    }
}

impl Cli {
    /// The endpoint to query: `--endpoint` if given, else the network's deployment.
    pub fn resolve_endpoint(&self) -> Result<Endpoint, SubgraphError> {
        match &self.endpoint {
            Some(url) => Endpoint::new(url.as_str())
                .ok_or_else(|| SubgraphError::invalid_parameter("endpoint", ParamKind::NonEmptyString)),
            None => resolve_endpoint(&self.network),
        }
    }

    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..HttpTransportConfig::default()
        }
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, String> {
    Timestamp::parse(value)
        .ok_or_else(|| format!("'{value}' is not an RFC 3339 date-time or YYYY-MM-DD date"))
}
