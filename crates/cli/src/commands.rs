//! Command dispatch.

use anyhow::Context;
use http_transport::HttpTransport;
use subgraph::{GroupQuery, SubgraphClient, Transport};
use tracing::info;

use crate::config::{Cli, Command};

/// Runs the selected command and returns what should be printed on stdout.
pub async fn run(cli: &Cli) -> anyhow::Result<String> {
    let endpoint = cli.resolve_endpoint()?;
    let transport = HttpTransport::with_config(cli.transport_config())?;
    info!(%endpoint, "querying subgraph");
    execute(&SubgraphClient::with_endpoint(endpoint, transport), &cli.command).await
}

/// Runs `command` against `client`. `query` only renders and never calls the
/// transport.
pub async fn execute<T: Transport>(
    client: &SubgraphClient<T>,
    command: &Command,
) -> anyhow::Result<String> {
    let output = match command {
        Command::Ids => serde_json::to_string_pretty(&client.get_group_ids().await?)?,
        Command::Groups(args) => {
            serde_json::to_string_pretty(&client.get_groups(&args.to_options()).await?)?
        }
        Command::Group { id, include } => serde_json::to_string_pretty(
            &client
                .get_group(id, &include.to_options())
                .await
                .with_context(|| format!("failed to fetch group {id}"))?,
        )?,
        Command::IsMember { group_id, member } => {
            serde_json::to_string_pretty(&client.is_group_member(group_id, member).await?)?
        }
        Command::Query(args) => GroupQuery::collection(&args.to_options()).render(),
    };
    Ok(output)
}
