//! Error types for st-db

use st_core::CoreError;
use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Ledger table absent when expected (D003)
    #[error("[D003] Migrations table does not exist; run `strata init` first")]
    NoLedgerTable,

    /// Ledger table already present when creation was requested (D004)
    #[error("[D004] Migrations table already exists")]
    LedgerTableExists,

    /// Advisory lock held by another process (D005)
    #[error(
        "[D005] Migration lock already held by {locked_by} since {locked_at} \
         (operation: {operation})"
    )]
    LockHeld {
        locked_by: String,
        locked_at: String,
        operation: String,
    },

    /// Advisory lock held, but the holder row could not be read back (D006)
    #[error("[D006] Migration lock already held (holder details unavailable: {0})")]
    LockHeldUnknown(String),

    /// No snapshot stored for the requested migration index (D007)
    #[error("[D007] No snapshot found for migration {index}")]
    SnapshotNotFound { index: String },

    /// Snapshot already captured for this index; capture is write-once (D008)
    #[error("[D008] Snapshot already captured for migration {index}")]
    SnapshotExists { index: String },

    /// No snapshots stored at all (D009)
    #[error("[D009] No snapshots have been captured yet")]
    NoSnapshots,

    /// Stored snapshot could not be decoded (D010)
    #[error("[D010] Snapshot for migration {index} is corrupt: {message}")]
    SnapshotDecode { index: String, message: String },

    /// Target table for a data sync does not exist (D011)
    #[error("[D011] Table not found: {0}")]
    TableNotFound(String),

    /// Transaction management error (D012)
    #[error("[D012] Transaction failed: {0}")]
    TransactionError(String),

    /// A migration failed partway through the apply pipeline (D013)
    #[error("[D013] Applying migration {index}: {source}")]
    ApplyFailed {
        index: String,
        #[source]
        source: Box<DbError>,
    },

    /// Error from the core layer: file scanning or chain reconciliation (D014)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for [`DbError`]
pub type DbResult<T> = Result<T, DbError>;
