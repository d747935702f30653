//! Status command implementation - prints the reconciled migration chain

use anyhow::Result;
use st_db::{migration_chain, DbError};

use crate::cli::GlobalArgs;
use crate::commands::common::{green, red, ProjectContext};

/// Execute the status command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.open_database(global)?;

    println!("{}", green("Checking migration chain..."));

    let chain = match migration_chain(&db, &ctx.migrations_dir()).await {
        Ok(chain) => chain,
        Err(e @ DbError::NoLedgerTable) => {
            eprintln!("{}", red("Migrations table does not exist."));
            return Err(e.into());
        }
        Err(e) => {
            eprintln!("{}", red(&format!("Error checking migration status: {e}")));
            return Err(e.into());
        }
    };

    if chain.is_empty() {
        println!("No migration files found.");
        return Ok(());
    }

    for migration in &chain {
        match &migration.applied_at {
            Some(applied_at) => println!(
                "Migration {} - Status: {} ({})",
                migration.index, migration.status, applied_at
            ),
            None => println!(
                "Migration {} - Status: {}",
                migration.index, migration.status
            ),
        }
        if global.verbose {
            println!("  file: {}", migration.path.display());
        }
    }

    Ok(())
}
