//! DuckDB store implementation
//!
//! All three store traits are implemented on one backend holding a single
//! connection. That is deliberate: the apply pipeline needs ledger inserts,
//! snapshot captures, and migration SQL to share one transactional context so
//! a single rollback undoes everything from the current batch.

use crate::error::{DbError, DbResult};
use crate::traits::{LockStore, MigrationStore, SeedStore};
use async_trait::async_trait;
use duckdb::{params, params_from_iter, Connection};
use st_core::{AppliedRecord, Lock, SchemaSnapshot, SeedRow, SeedValue};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

const LEDGER_TABLE: &str = "strata_migrations";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Begin a transaction on the backend's connection.
    ///
    /// Every store operation until [`commit`](Self::commit) or
    /// [`rollback`](Self::rollback) runs inside it.
    pub async fn begin(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    /// Commit the current transaction
    pub async fn commit(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    /// Roll back the current transaction
    pub async fn rollback(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    /// Execute a query and return its row count
    pub async fn query_count(&self, sql: &str) -> DbResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({sql})"), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }

    /// Check if a table exists in the main schema
    fn table_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = 'main' AND table_name = ?",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    /// List all user tables (everything not prefixed `strata_`), sorted
    fn user_tables_sync(&self) -> DbResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = 'main' \
                 AND table_name NOT LIKE 'strata!_%' ESCAPE '!' \
                 ORDER BY table_name",
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DbError::ExecutionError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(tables)
    }

    /// Fetch the CREATE statement for a table from DuckDB's catalog
    fn table_definition_sync(&self, table: &str) -> DbResult<String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT sql FROM duckdb_tables() \
             WHERE schema_name = 'main' AND table_name = ?",
            params![table],
            |row| row.get(0),
        )
        .map_err(|e| DbError::ExecutionError(format!("reading definition of {table}: {e}")))
    }
}

#[async_trait]
impl MigrationStore for DuckDbBackend {
    async fn has_ledger_table(&self) -> DbResult<bool> {
        self.table_exists_sync(LEDGER_TABLE)
    }

    async fn create_ledger_table(&self) -> DbResult<()> {
        if self.table_exists_sync(LEDGER_TABLE)? {
            return Err(DbError::LedgerTableExists);
        }

        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE SEQUENCE IF NOT EXISTS strata_migrations_seq;
             CREATE TABLE strata_migrations (
                 id              BIGINT PRIMARY KEY DEFAULT nextval('strata_migrations_seq'),
                 migration_index VARCHAR NOT NULL UNIQUE,
                 applied_at      TIMESTAMP NOT NULL DEFAULT now()
             );",
        )
        .map_err(|e| DbError::ExecutionError(format!("creating migrations table: {e}")))
    }

    async fn applied_migrations(&self) -> DbResult<Vec<AppliedRecord>> {
        if !self.table_exists_sync(LEDGER_TABLE)? {
            return Err(DbError::NoLedgerTable);
        }

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, migration_index, strftime(applied_at, '%Y-%m-%d %H:%M:%S') \
                 FROM strata_migrations ORDER BY id",
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        let records = stmt
            .query_map([], |row| {
                Ok(AppliedRecord {
                    id: row.get(0)?,
                    index: row.get(1)?,
                    applied_at: row.get(2)?,
                })
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(records)
    }

    async fn run_sql(&self, sql: &str) -> DbResult<()> {
        // execute_batch runs every semicolon-separated statement; a plain
        // execute would stop after the first and silently drop the rest.
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    async fn record_applied(&self, index: &str) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO strata_migrations (migration_index) VALUES (?)",
            params![index],
        )
        .map_err(|e| DbError::ExecutionError(format!("recording migration {index}: {e}")))?;
        Ok(())
    }

    async fn ensure_snapshot_table(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE SEQUENCE IF NOT EXISTS strata_snapshots_seq;
             CREATE TABLE IF NOT EXISTS strata_snapshots (
                 id              BIGINT PRIMARY KEY DEFAULT nextval('strata_snapshots_seq'),
                 migration_index VARCHAR NOT NULL UNIQUE,
                 schema_snapshot VARCHAR NOT NULL,
                 captured_at     TIMESTAMP NOT NULL DEFAULT now()
             );",
        )
        .map_err(|e| DbError::ExecutionError(format!("creating snapshots table: {e}")))
    }

    async fn capture_snapshot(&self, index: &str) -> DbResult<()> {
        self.ensure_snapshot_table().await?;

        let mut schema = BTreeMap::new();
        for table in self.user_tables_sync()? {
            let definition = self.table_definition_sync(&table)?;
            schema.insert(table, definition);
        }

        let json = serde_json::to_string(&schema)
            .map_err(|e| DbError::ExecutionError(format!("encoding snapshot: {e}")))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO strata_snapshots (migration_index, schema_snapshot) VALUES (?, ?)",
            params![index, json],
        )
        .map_err(|e| {
            if is_constraint_violation(&e.to_string()) {
                DbError::SnapshotExists {
                    index: index.to_string(),
                }
            } else {
                DbError::ExecutionError(format!("storing snapshot for {index}: {e}"))
            }
        })?;
        Ok(())
    }

    async fn snapshot(&self, index: &str) -> DbResult<SchemaSnapshot> {
        self.ensure_snapshot_table().await?;

        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT schema_snapshot, strftime(captured_at, '%Y-%m-%d %H:%M:%S') \
             FROM strata_snapshots WHERE migration_index = ?",
            params![index],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );

        let (json, captured_at) = match result {
            Ok(row) => row,
            Err(duckdb::Error::QueryReturnedNoRows) => {
                return Err(DbError::SnapshotNotFound {
                    index: index.to_string(),
                })
            }
            Err(e) => return Err(DbError::ExecutionError(e.to_string())),
        };

        let tables: BTreeMap<String, String> =
            serde_json::from_str(&json).map_err(|e| DbError::SnapshotDecode {
                index: index.to_string(),
                message: e.to_string(),
            })?;

        Ok(SchemaSnapshot {
            migration_index: index.to_string(),
            tables,
            captured_at,
        })
    }

    async fn latest_snapshot_index(&self) -> DbResult<String> {
        self.ensure_snapshot_table().await?;

        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT migration_index FROM strata_snapshots ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        ) {
            Ok(index) => Ok(index),
            Err(duckdb::Error::QueryReturnedNoRows) => Err(DbError::NoSnapshots),
            Err(e) => Err(DbError::ExecutionError(e.to_string())),
        }
    }
}

#[async_trait]
impl LockStore for DuckDbBackend {
    async fn ensure_lock_table(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS strata_lock (
                 id        INTEGER PRIMARY KEY,
                 locked_by VARCHAR NOT NULL,
                 locked_at TIMESTAMP NOT NULL DEFAULT now(),
                 operation VARCHAR NOT NULL
             );",
        )
        .map_err(|e| DbError::ExecutionError(format!("creating lock table: {e}")))
    }

    async fn acquire(&self, operation: &str) -> DbResult<()> {
        self.ensure_lock_table().await?;

        let locked_by = locker_identity();
        let insert = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO strata_lock (id, locked_by, operation) VALUES (1, ?, ?)",
                params![locked_by, operation],
            )
        };

        match insert {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e.to_string()) => {
                // The row already exists. Read the holder back for the error
                // message; if that secondary read fails, still report the
                // lock as held.
                match self.holder().await {
                    Ok(Some(lock)) => Err(DbError::LockHeld {
                        locked_by: lock.locked_by,
                        locked_at: lock.locked_at,
                        operation: lock.operation,
                    }),
                    Ok(None) => Err(DbError::LockHeldUnknown(
                        "holder released between insert and read".to_string(),
                    )),
                    Err(read_err) => Err(DbError::LockHeldUnknown(read_err.to_string())),
                }
            }
            Err(e) => Err(DbError::ExecutionError(format!("acquiring lock: {e}"))),
        }
    }

    async fn release(&self) -> DbResult<()> {
        self.ensure_lock_table().await?;

        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM strata_lock WHERE id = 1", [])
            .map_err(|e| DbError::ExecutionError(format!("releasing lock: {e}")))?;
        Ok(())
    }

    async fn holder(&self) -> DbResult<Option<Lock>> {
        self.ensure_lock_table().await?;

        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT locked_by, strftime(locked_at, '%Y-%m-%d %H:%M:%S'), operation \
             FROM strata_lock WHERE id = 1",
            [],
            |row| {
                Ok(Lock {
                    locked_by: row.get(0)?,
                    locked_at: row.get(1)?,
                    operation: row.get(2)?,
                })
            },
        ) {
            Ok(lock) => Ok(Some(lock)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::ExecutionError(e.to_string())),
        }
    }
}

#[async_trait]
impl SeedStore for DuckDbBackend {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        self.table_exists_sync(table)
    }

    async fn truncate_table(&self, table: &str) -> DbResult<()> {
        if !self.table_exists_sync(table)? {
            return Err(DbError::TableNotFound(table.to_string()));
        }

        // DELETE instead of TRUNCATE so the operation stays inside the
        // caller's transaction.
        let conn = self.conn.lock().unwrap();
        conn.execute(&format!("DELETE FROM {}", quote_ident(table)), [])
            .map_err(|e| DbError::ExecutionError(format!("truncating {table}: {e}")))?;
        Ok(())
    }

    async fn insert_row(&self, table: &str, row: &SeedRow) -> DbResult<()> {
        if row.is_empty() {
            return Ok(());
        }

        let columns: Vec<String> = row.keys().map(|c| quote_ident(c)).collect();
        let placeholders = vec!["?"; row.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns.join(", "),
            placeholders
        );

        let values = row.values().map(seed_value_to_sql);

        let conn = self.conn.lock().unwrap();
        conn.execute(&sql, params_from_iter(values))
            .map_err(|e| DbError::ExecutionError(format!("inserting into {table}: {e}")))?;
        Ok(())
    }

    async fn load_csv(&self, table: &str, path: &Path) -> DbResult<usize> {
        let csv_path = path.display().to_string().replace('\'', "''");
        let sql = format!(
            "INSERT INTO {} BY NAME SELECT * FROM read_csv_auto('{}', header = true)",
            quote_ident(table),
            csv_path
        );

        let conn = self.conn.lock().unwrap();
        conn.execute(&sql, [])
            .map_err(|e| DbError::ExecutionError(format!("loading CSV into {table}: {e}")))
    }
}

/// "hostname:pid" identity for the current process, used as the lock holder
/// value so operators can tell which machine holds the lock.
fn locker_identity() -> String {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string());
    format!("{host}:{}", std::process::id())
}

/// Quote an identifier for direct interpolation into SQL
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Classify a DuckDB error message as a uniqueness/key violation.
///
/// duckdb::Error does not expose structured variants, so string matching is
/// the only reliable approach.
fn is_constraint_violation(msg: &str) -> bool {
    msg.contains("Constraint Error") || msg.contains("Duplicate key")
}

/// Convert a template value into a bindable DuckDB value
fn seed_value_to_sql(value: &SeedValue) -> duckdb::types::Value {
    use duckdb::types::Value;
    match value {
        SeedValue::Null => Value::Null,
        SeedValue::Bool(b) => Value::Boolean(*b),
        SeedValue::Integer(i) => Value::BigInt(*i),
        SeedValue::Float(f) => Value::Double(*f),
        SeedValue::Text(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
