use super::*;
use std::fs;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "SELECT 1;").unwrap();
}

#[test]
fn test_scan_returns_sorted_by_index() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "240103000000_third.sql");
    touch(dir.path(), "240101000000_first.sql");
    touch(dir.path(), "240102000000_second.sql");

    let files = scan_migrations(dir.path()).unwrap();
    let indices: Vec<&str> = files.iter().map(|f| f.index.as_str()).collect();
    assert_eq!(
        indices,
        vec!["240101000000", "240102000000", "240103000000"]
    );
    assert_eq!(files[0].name, "first");
}

#[test]
fn test_scan_skips_non_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "240101000000_valid.sql");
    touch(dir.path(), "readme.md");
    touch(dir.path(), "notes.sql");
    touch(dir.path(), "12345_short_index.sql");
    touch(dir.path(), "240101000000_no_extension");
    touch(dir.path(), "240101000000.sql"); // no name after index

    let files = scan_migrations(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "valid");
}

#[test]
fn test_scan_skips_multibyte_filename_in_index_position() {
    let dir = tempfile::tempdir().unwrap();
    // A multibyte character straddling the index boundary must be skipped
    // like any other non-matching filename, not panic the scan.
    touch(dir.path(), "12345678901é_x.sql");
    touch(dir.path(), "240101000000_valid.sql");

    let files = scan_migrations(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "valid");
}

#[test]
fn test_scan_skips_directories() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("240101000000_actually_a_dir.sql")).unwrap();
    touch(dir.path(), "240102000000_real.sql");

    let files = scan_migrations(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].index, "240102000000");
}

#[test]
fn test_scan_missing_directory() {
    let err = scan_migrations(Path::new("/nonexistent/migrations")).unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirNotFound { .. }));
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let files = scan_migrations(dir.path()).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_scan_returns_absolute_paths() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "240101000000_abs.sql");

    let files = scan_migrations(dir.path()).unwrap();
    assert!(files[0].path.is_absolute());
}

#[test]
fn test_create_migration_file() {
    let dir = tempfile::tempdir().unwrap();
    let filename = create_migration_file(dir.path(), "add_users").unwrap();

    assert!(filename.ends_with("_add_users.sql"));
    assert!(dir.path().join(&filename).exists());

    // The generated file must itself pass the scan filter.
    let files = scan_migrations(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "add_users");
}

#[test]
fn test_create_migration_file_missing_directory() {
    let err = create_migration_file(Path::new("/nonexistent/migrations"), "x").unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirNotFound { .. }));
}
