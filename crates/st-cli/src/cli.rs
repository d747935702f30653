//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Strata - file-based schema migrations with snapshots and advisory locking
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path (default: <project-dir>/strata.yml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the migrations directory
    #[arg(short = 'm', long, global = true)]
    pub migrations_dir: Option<String>,

    /// Override the templates directory
    #[arg(short = 't', long, global = true)]
    pub templates_dir: Option<String>,

    /// Override database path
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the migrations ledger table in the database
    Init,

    /// Show the status of every migration in the chain
    Status,

    /// Apply all pending migrations in one transaction
    Up,

    /// Print a stored schema snapshot (latest when no index is given)
    Snapshot(SnapshotArgs),

    /// Create a new timestamped migration file
    Make(MakeArgs),

    /// Synchronize configured tables from template data
    Sync,

    /// Force-release the advisory lock left behind by a crashed run
    Unlock,
}

/// Arguments for the snapshot command
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Migration index of the snapshot to show
    pub index: Option<String>,
}

/// Arguments for the make command
#[derive(Args, Debug)]
pub struct MakeArgs {
    /// Descriptive name for the new migration (e.g. add_users_table)
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
