//! Init command implementation - creates the migrations ledger table

use anyhow::Result;
use st_db::{DbError, MigrationStore};

use crate::cli::GlobalArgs;
use crate::commands::common::{green, red, yellow, ProjectContext};

/// Execute the init command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.open_database(global)?;

    println!("{}", green("Initializing migrations system..."));

    match db.create_ledger_table().await {
        Ok(()) => {
            println!("{}", green("Migrations table created successfully."));
            Ok(())
        }
        Err(DbError::LedgerTableExists) => {
            println!("{}", yellow("Migrations table already exists."));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", red(&format!("Error creating migrations table: {e}")));
            Err(e.into())
        }
    }
}
