//! The apply pipeline for a single migration

use crate::error::{DbError, DbResult};
use crate::traits::MigrationStore;
use st_core::{CoreError, Migration};

/// Apply one migration: run its SQL, record it in the ledger, and capture a
/// schema snapshot.
///
/// Intended to be called once per pending migration inside a transaction the
/// caller owns and commits or rolls back as a single unit across the whole
/// batch. Each step must fully succeed before the next runs; any failure
/// aborts the batch.
///
/// An empty or whitespace-only migration file skips SQL execution but is
/// still recorded and snapshotted.
pub async fn apply_migration(store: &dyn MigrationStore, migration: &Migration) -> DbResult<()> {
    let wrap = |source: DbError| DbError::ApplyFailed {
        index: migration.index.clone(),
        source: Box::new(source),
    };

    let sql = std::fs::read_to_string(&migration.path)
        .map_err(|e| {
            wrap(DbError::Core(CoreError::IoWithPath {
                path: migration.path.display().to_string(),
                source: e,
            }))
        })?;

    if !sql.trim().is_empty() {
        store.run_sql(&sql).await.map_err(wrap)?;
    }

    store.record_applied(&migration.index).await.map_err(wrap)?;
    store
        .capture_snapshot(&migration.index)
        .await
        .map_err(wrap)?;

    Ok(())
}
