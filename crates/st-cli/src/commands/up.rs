//! Up command implementation - applies all pending migrations
//!
//! The whole batch runs inside one transaction under the advisory lock:
//! acquire, reconcile, apply each pending migration ascending, commit or
//! roll back as a unit, release.

use anyhow::Result;
use st_core::Migration;
use st_db::{apply_migration, migration_chain, DbError, DuckDbBackend, LockStore};

use crate::cli::GlobalArgs;
use crate::commands::common::{confirm, green, red, ProjectContext};

/// Execute the up command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.open_database(global)?;

    db.acquire("migrate up").await?;
    let result = run_migrations(&db, &ctx, global).await;

    // Release even on the error path; a failed release only costs a manual
    // `strata unlock`, so it must not mask the original error.
    if let Err(e) = db.release().await {
        log::warn!("Failed to release migration lock: {e}");
    }

    result
}

async fn run_migrations(
    db: &DuckDbBackend,
    ctx: &ProjectContext,
    global: &GlobalArgs,
) -> Result<()> {
    println!("{}", green("Checking migration chain..."));

    let chain = match migration_chain(db, &ctx.migrations_dir()).await {
        Ok(chain) => chain,
        Err(e @ DbError::NoLedgerTable) => {
            eprintln!("{}", red("Migrations table does not exist."));
            return Err(e.into());
        }
        Err(e) => {
            eprintln!("{}", red(&format!("Error applying migrations: {e}")));
            return Err(e.into());
        }
    };

    for migration in &chain {
        println!(
            "Migration {} - Status: {}",
            migration.index, migration.status
        );
    }

    let pending: Vec<&Migration> = chain.iter().filter(|m| m.is_pending()).collect();
    if pending.is_empty() {
        println!("No pending migrations to apply.");
        return Ok(());
    }

    if !global.yes
        && !confirm(&format!(
            "{} pending migrations found. Apply now? (only 'yes' will apply): ",
            pending.len()
        ))
    {
        println!("Migration aborted by user.");
        return Ok(());
    }

    db.begin().await?;

    for migration in &pending {
        println!("Applying migration {}...", migration.index);
        if let Err(e) = apply_migration(db, migration).await {
            // Keep the apply error as the reported failure even if the
            // rollback also fails.
            if let Err(rb) = db.rollback().await {
                log::warn!("Rollback failed after migration error: {rb}");
            }
            eprintln!("{}", red(&format!("Error applying migrations: {e}")));
            return Err(e.into());
        }
    }

    db.commit().await?;

    println!("{}", green("All migrations applied successfully."));
    Ok(())
}
