//! Strata CLI - file-based schema migrations with snapshots and advisory locking

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{init, make, snapshot, status, sync, unlock, up};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Init => init::execute(&cli.global).await,
        cli::Commands::Status => status::execute(&cli.global).await,
        cli::Commands::Up => up::execute(&cli.global).await,
        cli::Commands::Snapshot(args) => snapshot::execute(args, &cli.global).await,
        cli::Commands::Make(args) => make::execute(args, &cli.global).await,
        cli::Commands::Sync => sync::execute(&cli.global).await,
        cli::Commands::Unlock => unlock::execute(&cli.global).await,
    }
}
