//! dexsync CLI — Pokédex submission ingestion tool.
//!
//! Validates crowd-submitted entries from a pull request against the
//! catalog and merges them into the published dataset. The process exit
//! status is the gate the CI automation uses to allow the merge.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
