//! Migration domain types
//!
//! A migration lives in two places: as a timestamped SQL file on disk and as
//! a row in the `strata_migrations` ledger once applied. [`Migration`] is the
//! reconciled aggregate combining both, computed fresh on every status query
//! and never persisted.

use std::fmt;
use std::path::PathBuf;

/// Width of the timestamp index prefix in migration filenames.
pub const INDEX_WIDTH: usize = 12;

/// A migration file discovered on disk.
///
/// The `index` is a 12-character zero-padded timestamp string, so a plain
/// lexicographic sort is also a chronological sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// 12-digit timestamp index extracted from the filename
    pub index: String,

    /// Descriptive slug (filename without index prefix and `.sql` suffix)
    pub name: String,

    /// Absolute path to the SQL file
    pub path: PathBuf,
}

/// A row from the applied-migration ledger.
///
/// Rows are written exactly once when a migration is applied and never
/// updated or deleted by normal operation. The `id` is assigned by the store
/// and reflects application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRecord {
    /// Monotonic sequence id assigned by the ledger
    pub id: i64,

    /// Migration index this record refers to
    pub index: String,

    /// When the migration was applied, formatted for display
    pub applied_at: String,
}

/// Computed status of a migration in the reconciled chain.
///
/// Any applied record that cannot be resolved to a file is a fatal
/// `BrokenChain` error rather than a per-migration status, so only these two
/// states exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    /// Recorded in the ledger with a matching file on disk
    Applied,
    /// Present on disk but not yet recorded in the ledger
    Pending,
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationStatus::Applied => write!(f, "applied"),
            MigrationStatus::Pending => write!(f, "pending"),
        }
    }
}

/// The reconciled aggregate combining file state and ledger state for a
/// single migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// 12-digit timestamp index
    pub index: String,

    /// Descriptive slug from the filename
    pub name: String,

    /// Absolute path to the SQL file
    pub path: PathBuf,

    /// When the migration was applied; `None` while pending
    pub applied_at: Option<String>,

    /// Computed status
    pub status: MigrationStatus,
}

impl Migration {
    /// True if this migration has not been applied yet.
    pub fn is_pending(&self) -> bool {
        self.status == MigrationStatus::Pending
    }
}
