//! Chain reconciliation
//!
//! Reconciles migration files on disk against the applied-migration ledger
//! and classifies each migration as applied or pending. This is a pure
//! function of its inputs; reading the filesystem and the ledger is the
//! caller's job so the algorithm can be tested without a database.

use crate::error::{CoreError, CoreResult};
use crate::migration::{AppliedRecord, Migration, MigrationFile, MigrationStatus};
use std::collections::HashMap;

/// Reconcile `files` (sorted ascending by index) against `records` (in
/// application order) and return the full migration chain.
///
/// Every applied record must resolve to exactly one file on disk. A record
/// whose index has no matching file means the database believes a migration
/// ran that can no longer be located or re-verified; that is a fatal
/// `BrokenChain` error requiring operator intervention, never something to
/// guess around.
pub fn build_chain(
    files: Vec<MigrationFile>,
    records: Vec<AppliedRecord>,
) -> CoreResult<Vec<Migration>> {
    let mut applied: HashMap<&str, &AppliedRecord> =
        records.iter().map(|r| (r.index.as_str(), r)).collect();

    for record in &records {
        if !files.iter().any(|f| f.index == record.index) {
            return Err(CoreError::BrokenChain {
                index: record.index.clone(),
            });
        }
    }

    let chain = files
        .into_iter()
        .map(|file| match applied.remove(file.index.as_str()) {
            Some(record) => Migration {
                index: file.index,
                name: file.name,
                path: file.path,
                applied_at: Some(record.applied_at.clone()),
                status: MigrationStatus::Applied,
            },
            None => Migration {
                index: file.index,
                name: file.name,
                path: file.path,
                applied_at: None,
                status: MigrationStatus::Pending,
            },
        })
        .collect();

    Ok(chain)
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
