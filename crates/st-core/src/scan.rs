//! Migration directory scanning and file scaffolding
//!
//! Migration filenames follow the fixed convention
//! `<12-digit-index>_<name>.sql`. Anything else in the directory is silently
//! ignored, including subdirectories.

use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationFile, INDEX_WIDTH};
use std::path::Path;

/// Parse a filename of the form `<12 digits>_<name>.sql`.
///
/// Returns `(index, name)` or `None` if the filename does not match the
/// convention.
fn parse_migration_filename(filename: &str) -> Option<(&str, &str)> {
    let stem = filename.strip_suffix(".sql")?;
    let bytes = stem.as_bytes();
    if bytes.len() < INDEX_WIDTH + 2 {
        return None;
    }
    // Check the prefix bytes before splitting: a non-digit byte at position
    // 12 could be the middle of a multibyte character, where split_at would
    // panic on the char boundary.
    if !bytes[..INDEX_WIDTH].iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (index, rest) = stem.split_at(INDEX_WIDTH);
    let name = rest.strip_prefix('_')?;
    if name.is_empty() {
        return None;
    }
    Some((index, name))
}

/// Scan `dir` for SQL files matching the migration naming convention and
/// return them sorted ascending by index.
///
/// The result reflects the filesystem at call time only; no state is kept
/// between calls. Fails with `MigrationsDirNotFound` if `dir` does not exist
/// or is not a directory.
pub fn scan_migrations(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let Some((index, name)) = parse_migration_filename(filename) else {
            continue;
        };

        // Canonicalize so error messages and ledger diagnostics always show
        // an absolute path regardless of how the directory was specified.
        let abs_path = path.canonicalize().unwrap_or(path.clone());

        files.push(MigrationFile {
            index: index.to_string(),
            name: name.to_string(),
            path: abs_path,
        });
    }

    files.sort_by(|a, b| a.index.cmp(&b.index));
    log::debug!("Found {} migration files in {}", files.len(), dir.display());
    Ok(files)
}

/// Create a new empty migration file in `dir` named with the current
/// timestamp. Returns the generated filename (not the full path).
///
/// The migrations directory must already exist.
pub fn create_migration_file(dir: &Path, name: &str) -> CoreResult<String> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let index = chrono::Local::now().format("%y%m%d%H%M%S");
    let filename = format!("{index}_{name}.sql");
    let path = dir.join(&filename);

    std::fs::write(&path, "-- Write your migration SQL here\n").map_err(|e| {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    Ok(filename)
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
