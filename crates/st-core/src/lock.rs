//! Advisory lock domain type

/// A row in the `strata_lock` table.
///
/// At most one row can exist (id is always 1), so the presence of a row means
/// the lock is held. There is no TTL or lease: a crashed holder leaves the
/// lock held until an operator runs `strata unlock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    /// "hostname:pid" identity of the process that acquired the lock
    pub locked_by: String,

    /// When the lock was acquired, formatted for display
    pub locked_at: String,

    /// Which command holds the lock (e.g. "migrate up", "template sync")
    pub operation: String,
}
