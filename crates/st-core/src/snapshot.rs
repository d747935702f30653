//! Schema snapshot domain type

use std::collections::BTreeMap;

/// A point-in-time capture of every user-defined table's structural
/// definition, tied to the migration index that was active when it was
/// captured.
///
/// Snapshots are write-once per index and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSnapshot {
    /// Index of the migration this snapshot was captured after
    pub migration_index: String,

    /// Table name mapped to its full CREATE statement.
    ///
    /// A BTreeMap so iteration is already sorted by table name for display.
    pub tables: BTreeMap<String, String>,

    /// When the snapshot was captured, formatted for display
    pub captured_at: String,
}
