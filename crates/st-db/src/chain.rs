//! Migration chain queries against a store

use crate::error::DbResult;
use crate::traits::MigrationStore;
use st_core::{build_chain, scan_migrations, Migration};
use std::path::Path;

/// Build the full migration chain for `migrations_dir`.
///
/// Reads the ledger (fails with `NoLedgerTable` when uninitialized), scans
/// the directory, and reconciles the two. Read-only; safe to call while
/// another process holds the lock.
pub async fn migration_chain(
    store: &dyn MigrationStore,
    migrations_dir: &Path,
) -> DbResult<Vec<Migration>> {
    let records = store.applied_migrations().await?;
    let files = scan_migrations(migrations_dir)?;
    Ok(build_chain(files, records)?)
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
