//! Integration tests for the full migrate flow against in-memory DuckDB.
//!
//! These exercise the same sequence the CLI `up` command drives: acquire the
//! lock, build the chain, apply pending migrations inside one transaction,
//! and commit or roll back as a unit.

use st_core::MigrationStatus;
use st_db::{apply_migration, migration_chain, DbError, DuckDbBackend, LockStore, MigrationStore};
use std::fs;
use std::path::Path;

fn write_migration(dir: &Path, name: &str, sql: &str) {
    fs::write(dir.join(name), sql).unwrap();
}

/// Apply every pending migration in one transaction, rolling back on the
/// first failure. Mirrors the CLI up command's control flow.
async fn run_up(db: &DuckDbBackend, migrations_dir: &Path) -> Result<usize, DbError> {
    db.acquire("migrate up").await?;

    let result = async {
        let chain = migration_chain(db, migrations_dir).await?;
        let pending: Vec<_> = chain.into_iter().filter(|m| m.is_pending()).collect();
        if pending.is_empty() {
            return Ok(0);
        }

        db.begin().await?;
        for migration in &pending {
            if let Err(e) = apply_migration(db, migration).await {
                db.rollback().await?;
                return Err(e);
            }
        }
        db.commit().await?;
        Ok(pending.len())
    }
    .await;

    db.release().await.ok();
    result
}

#[tokio::test]
async fn test_up_applies_pending_migrations_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        "240101000000_create_users.sql",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR);",
    );
    write_migration(
        dir.path(),
        "240102000000_add_index_data.sql",
        "INSERT INTO users VALUES (1, 'ada');",
    );

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();

    let applied = run_up(&db, dir.path()).await.unwrap();
    assert_eq!(applied, 2);

    // Ledger reflects both migrations in application order.
    let records = db.applied_migrations().await.unwrap();
    let indices: Vec<&str> = records.iter().map(|r| r.index.as_str()).collect();
    assert_eq!(indices, vec!["240101000000", "240102000000"]);

    // The data from the second migration is present.
    assert_eq!(db.query_count("SELECT * FROM users").await.unwrap(), 1);

    // One snapshot per migration, latest being the second.
    assert_eq!(
        db.latest_snapshot_index().await.unwrap(),
        "240102000000"
    );
    let snapshot = db.snapshot("240101000000").await.unwrap();
    assert!(snapshot.tables.contains_key("users"));
}

#[tokio::test]
async fn test_up_is_idempotent_once_applied() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        "240101000000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();

    assert_eq!(run_up(&db, dir.path()).await.unwrap(), 1);
    assert_eq!(run_up(&db, dir.path()).await.unwrap(), 0);
    assert_eq!(db.applied_migrations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_batch_rolls_back_completely() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        "240101000000_create_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );
    write_migration(
        dir.path(),
        "240102000000_broken.sql",
        "INSERT INTO does_not_exist VALUES (1);",
    );

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();

    let err = run_up(&db, dir.path()).await.unwrap_err();
    assert!(matches!(err, DbError::ApplyFailed { .. }));

    // Neither migration's ledger record survives the rollback, and the first
    // migration's table is gone too.
    assert!(db.applied_migrations().await.unwrap().is_empty());
    assert!(db.query_count("SELECT * FROM users").await.is_err());
}

#[tokio::test]
async fn test_empty_migration_file_is_recorded_and_snapshotted() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "240101000000_noop.sql", "   \n\n  ");

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();

    assert_eq!(run_up(&db, dir.path()).await.unwrap(), 1);

    let records = db.applied_migrations().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].index, "240101000000");
    assert!(db.snapshot("240101000000").await.is_ok());
}

#[tokio::test]
async fn test_multi_statement_migration_runs_fully() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        "240101000000_multi.sql",
        "CREATE TABLE a (id INTEGER);
         CREATE TABLE b (id INTEGER);
         INSERT INTO a VALUES (1);
         INSERT INTO b VALUES (2);",
    );

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();
    run_up(&db, dir.path()).await.unwrap();

    assert_eq!(db.query_count("SELECT * FROM a").await.unwrap(), 1);
    assert_eq!(db.query_count("SELECT * FROM b").await.unwrap(), 1);

    let snapshot = db.snapshot("240101000000").await.unwrap();
    assert_eq!(
        snapshot.tables.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[tokio::test]
async fn test_up_released_lock_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "240101000000_broken.sql", "NOT VALID SQL;");

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();

    assert!(run_up(&db, dir.path()).await.is_err());

    // Lock was released on the error path; a new run can acquire it.
    assert!(db.holder().await.unwrap().is_none());
    db.acquire("migrate up").await.unwrap();
}

#[tokio::test]
async fn test_chain_status_after_partial_apply() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        "240101000000_first.sql",
        "CREATE TABLE t1 (id INTEGER);",
    );

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();
    run_up(&db, dir.path()).await.unwrap();

    // A new file appears after the first run.
    write_migration(
        dir.path(),
        "240102000000_second.sql",
        "CREATE TABLE t2 (id INTEGER);",
    );

    let chain = migration_chain(&db, dir.path()).await.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].status, MigrationStatus::Applied);
    assert!(chain[0].applied_at.is_some());
    assert_eq!(chain[1].status, MigrationStatus::Pending);
}

#[tokio::test]
async fn test_broken_chain_against_real_store() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        "240101000000_first.sql",
        "CREATE TABLE t1 (id INTEGER);",
    );

    let db = DuckDbBackend::in_memory().unwrap();
    db.create_ledger_table().await.unwrap();
    run_up(&db, dir.path()).await.unwrap();

    // The applied file disappears from disk.
    fs::remove_file(dir.path().join("240101000000_first.sql")).unwrap();

    let err = migration_chain(&db, dir.path()).await.unwrap_err();
    assert!(err.to_string().contains("240101000000"));
}
