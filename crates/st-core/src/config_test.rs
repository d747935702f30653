use super::*;
use std::fs;

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.yml");
    fs::write(
        &path,
        r#"
migrations_dir: db/migrations
templates_dir: db/templates
database:
  path: data/app.duckdb
tables:
  - name: currencies
  - name: countries
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.templates_dir, "db/templates");
    assert_eq!(config.database.path, "data/app.duckdb");
    assert_eq!(config.tables.len(), 2);
    assert_eq!(config.tables[0].name, "currencies");
}

#[test]
fn test_load_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("strata.yml")).unwrap();

    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.templates_dir, "templates");
    assert_eq!(config.database.path, "strata.duckdb");
    assert!(config.tables.is_empty());
}

#[test]
fn test_load_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.yml");
    fs::write(&path, "migrations_dir: schema\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.migrations_dir, "schema");
    assert_eq!(config.templates_dir, "templates");
    assert_eq!(config.database.path, "strata.duckdb");
}

#[test]
fn test_load_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.yml");
    fs::write(&path, "migrations: typo_field\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.yml");
    fs::write(&path, "tables: [unclosed\n").unwrap();

    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigParseError { .. })
    ));
}

#[test]
fn test_directory_resolution() {
    let config = Config::default();
    let root = Path::new("/srv/project");
    assert_eq!(
        config.migrations_dir_absolute(root),
        PathBuf::from("/srv/project/migrations")
    );
    assert_eq!(
        config.templates_dir_absolute(root),
        PathBuf::from("/srv/project/templates")
    );
}
