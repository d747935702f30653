//! Sync command implementation - reloads configured tables from template data
//!
//! Each configured table is truncated and reloaded from its record files in
//! one transaction under the advisory lock, so a half-finished sync never
//! leaves partially loaded tables behind.

use anyhow::Result;
use st_core::{discover_tables, load_row, RecordKind, TemplateTable};
use st_db::{DuckDbBackend, LockStore, SeedStore};

use crate::cli::GlobalArgs;
use crate::commands::common::{confirm, green, red, ProjectContext};

/// Execute the sync command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    if ctx.config.tables.is_empty() {
        println!("No tables configured for sync. Add a `tables` section to strata.yml.");
        return Ok(());
    }

    let tables = discover_tables(&ctx.templates_dir(), &ctx.config.tables)?;

    if !global.yes
        && !confirm(&format!(
            "{} tables will be truncated and reloaded. Continue? (only 'yes' will sync): ",
            tables.len()
        ))
    {
        println!("Sync aborted by user.");
        return Ok(());
    }

    let db = ctx.open_database(global)?;

    db.acquire("template sync").await?;
    let result = sync_tables(&db, &tables).await;

    if let Err(e) = db.release().await {
        log::warn!("Failed to release migration lock: {e}");
    }

    result
}

async fn sync_tables(db: &DuckDbBackend, tables: &[TemplateTable]) -> Result<()> {
    db.begin().await?;

    for table in tables {
        if let Err(e) = sync_table(db, table).await {
            if let Err(rb) = db.rollback().await {
                log::warn!("Rollback failed after sync error: {rb}");
            }
            eprintln!(
                "{}",
                red(&format!("Error syncing table {}: {e}", table.name))
            );
            return Err(e);
        }
    }

    db.commit().await?;
    println!("{}", green("All tables synced successfully."));
    Ok(())
}

async fn sync_table(db: &DuckDbBackend, table: &TemplateTable) -> Result<()> {
    db.truncate_table(&table.name).await?;

    let mut inserted = 0;
    for record in &table.records {
        match record.kind {
            RecordKind::Row => {
                if let Some(row) = load_row(record)? {
                    db.insert_row(&table.name, &row).await?;
                    inserted += 1;
                }
            }
            RecordKind::List => {
                inserted += db.load_csv(&table.name, &record.path).await?;
            }
        }
    }

    println!("Synced table {} ({} rows)", table.name, inserted);
    Ok(())
}
