//! st-db - Database layer for Strata
//!
//! This crate provides the store traits (`MigrationStore`, `LockStore`,
//! `SeedStore`), the DuckDB implementation behind them, and the chain/apply
//! operations composed on top of the traits.

pub mod apply;
pub mod chain;
pub mod duckdb;
pub mod error;
pub mod traits;

pub use apply::apply_migration;
pub use chain::migration_chain;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{LockStore, MigrationStore, SeedStore};
