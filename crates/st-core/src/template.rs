//! Template data domain
//!
//! Template data lives under `templates_dir/<table>/`: YAML files each hold a
//! single named row, CSV files hold row lists. `strata sync` truncates each
//! configured table and reloads it from these files.

use crate::config::TableConfig;
use crate::error::{CoreError, CoreResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single column value in a template record.
///
/// Row files are arbitrary column → value mappings, but the values themselves
/// are restricted to scalars so they can be bound as typed SQL parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Integer number
    Integer(i64),
    /// Floating-point number
    Float(f64),
    /// Text
    Text(String),
}

/// One row of template data: column name mapped to its value.
pub type SeedRow = BTreeMap<String, SeedValue>;

/// How a record file's contents map to rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A YAML file holding exactly one row
    Row,
    /// A CSV file holding zero or more rows
    List,
}

/// A record file discovered under a table's template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Filename without extension
    pub name: String,

    /// Full path to the record file
    pub path: PathBuf,

    /// Row or List, based on the file extension
    pub kind: RecordKind,
}

/// A table to be synchronized, with its discovered record files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTable {
    /// Table name (matches the subdirectory name)
    pub name: String,

    /// Path to the table's template directory
    pub path: PathBuf,

    /// Record files, in directory order
    pub records: Vec<Record>,
}

/// Discover the template directory for every configured table.
///
/// Each configured table must have a matching subdirectory of
/// `templates_dir`; files with unrecognized extensions are skipped silently.
pub fn discover_tables(
    templates_dir: &Path,
    tables: &[TableConfig],
) -> CoreResult<Vec<TemplateTable>> {
    if !templates_dir.is_dir() {
        return Err(CoreError::TemplatesDirNotFound {
            path: templates_dir.display().to_string(),
        });
    }

    let mut discovered = Vec::new();
    for table in tables {
        let table_path = templates_dir.join(&table.name);
        if !table_path.is_dir() {
            return Err(CoreError::TableDirNotFound {
                path: table_path.display().to_string(),
            });
        }

        let entries = std::fs::read_dir(&table_path).map_err(|e| CoreError::IoWithPath {
            path: table_path.display().to_string(),
            source: e,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: table_path.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let kind = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => RecordKind::Row,
                Some("csv") => RecordKind::List,
                _ => continue,
            };
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            records.push(Record {
                name: name.to_string(),
                path: path.clone(),
                kind,
            });
        }

        // Deterministic sync order regardless of directory listing order.
        records.sort_by(|a, b| a.name.cmp(&b.name));

        discovered.push(TemplateTable {
            name: table.name.clone(),
            path: table_path,
            records,
        });
    }

    Ok(discovered)
}

/// Load a single-row YAML record.
///
/// Returns `None` for an empty document. Values must be scalars; nested
/// mappings or sequences fail with `RecordParseError`.
pub fn load_row(record: &Record) -> CoreResult<Option<SeedRow>> {
    let content =
        std::fs::read_to_string(&record.path).map_err(|e| CoreError::IoWithPath {
            path: record.path.display().to_string(),
            source: e,
        })?;

    let row: Option<SeedRow> =
        serde_yaml::from_str(&content).map_err(|e| CoreError::RecordParseError {
            path: record.path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(row.filter(|r| !r.is_empty()))
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
