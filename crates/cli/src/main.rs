//! `groups-query`: command-line reader for a group-membership subgraph.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — flags with environment fallbacks (see [`config`]).
//! 2. **Wire observability** — `tracing-subscriber` with a human or JSON layer
//!    on stderr. Spans and events emitted by every crate in the workspace flow
//!    through it.
//! 3. **Construct infrastructure** — an `HttpTransport` injected into a
//!    `SubgraphClient` for the resolved endpoint.
//! 4. **Dispatch** — run the selected command and print its JSON result on stdout.

mod commands;
mod config;
mod logging;

use clap::Parser;

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format, &cli.log_level);

    let output = commands::run(&cli).await?;
    println!("{output}");
    Ok(())
}
