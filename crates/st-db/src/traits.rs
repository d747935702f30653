//! Store trait definitions
//!
//! These traits are the seams between the migration core and the database.
//! The CLI consumes them through [`crate::DuckDbBackend`]; tests substitute
//! mock implementations.

use crate::error::DbResult;
use async_trait::async_trait;
use st_core::{AppliedRecord, Lock, SchemaSnapshot, SeedRow};
use std::path::Path;

/// Ledger and snapshot operations for migrations.
///
/// Implementations must be Send + Sync for async operation. All writes go
/// against the backend's single connection, so a caller-managed transaction
/// (see [`crate::DuckDbBackend::begin`]) covers every operation invoked
/// within it.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Check whether the migrations ledger table exists
    async fn has_ledger_table(&self) -> DbResult<bool>;

    /// Create the ledger table; fails with `LedgerTableExists` if present
    async fn create_ledger_table(&self) -> DbResult<()>;

    /// Read all applied records ordered by application order (ledger id).
    /// Fails with `NoLedgerTable` if the ledger has not been initialized.
    async fn applied_migrations(&self) -> DbResult<Vec<AppliedRecord>>;

    /// Execute raw SQL, supporting multiple semicolon-separated statements
    async fn run_sql(&self, sql: &str) -> DbResult<()>;

    /// Insert a ledger record for the given migration index
    async fn record_applied(&self, index: &str) -> DbResult<()>;

    /// Idempotently create the snapshot table
    async fn ensure_snapshot_table(&self) -> DbResult<()>;

    /// Capture the current schema as a snapshot keyed by `index`.
    /// Write-once: a second capture for the same index fails.
    async fn capture_snapshot(&self, index: &str) -> DbResult<()>;

    /// Retrieve the snapshot stored for `index`
    async fn snapshot(&self, index: &str) -> DbResult<SchemaSnapshot>;

    /// Index of the most recently captured snapshot (by insertion order)
    async fn latest_snapshot_index(&self) -> DbResult<String>;
}

/// Advisory lock operations.
///
/// A cooperative, non-expiring mutex backed by atomic insert of a singleton
/// row. A crashed holder leaves the lock held until manually released.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Idempotently create the lock table
    async fn ensure_lock_table(&self) -> DbResult<()>;

    /// Acquire the lock, recording the calling process identity and the
    /// operation label. Fails with `LockHeld` when another process holds it.
    async fn acquire(&self, operation: &str) -> DbResult<()>;

    /// Release the lock. Releasing an unheld lock is a no-op.
    async fn release(&self) -> DbResult<()>;

    /// Current holder, or `None` when the lock is unheld
    async fn holder(&self) -> DbResult<Option<Lock>>;
}

/// Table data operations used by template sync.
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Check whether a user table exists
    async fn table_exists(&self, table: &str) -> DbResult<bool>;

    /// Delete all rows from a table; fails with `TableNotFound` if absent
    async fn truncate_table(&self, table: &str) -> DbResult<()>;

    /// Insert a single row of column → value pairs
    async fn insert_row(&self, table: &str, row: &SeedRow) -> DbResult<()>;

    /// Bulk-load a CSV file into a table by column name, returning the
    /// number of rows inserted
    async fn load_csv(&self, table: &str, path: &Path) -> DbResult<usize>;
}
