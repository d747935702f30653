//! st-core - Core library for Strata
//!
//! This crate provides the migration domain types, `strata.yml` configuration
//! parsing, migration file scanning, and the pure chain reconciliation
//! algorithm used across all Strata components.

pub mod chain;
pub mod config;
pub mod error;
pub mod lock;
pub mod migration;
pub mod scan;
pub mod snapshot;
pub mod template;

pub use chain::build_chain;
pub use config::{Config, TableConfig};
pub use error::{CoreError, CoreResult};
pub use lock::Lock;
pub use migration::{AppliedRecord, Migration, MigrationFile, MigrationStatus};
pub use scan::{create_migration_file, scan_migrations};
pub use snapshot::SchemaSnapshot;
pub use template::{
    discover_tables, load_row, Record, RecordKind, SeedRow, SeedValue, TemplateTable,
};
