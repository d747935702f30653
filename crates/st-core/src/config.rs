//! Configuration types and parsing for strata.yml

use crate::error::{CoreError, CoreResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config filename looked up in the project directory.
pub const CONFIG_FILENAME: &str = "strata.yml";

/// Main project configuration from strata.yml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing migration SQL files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Directory containing template data (one subdirectory per table)
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Tables kept in sync from template data by `strata sync`
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB database file, or ":memory:"
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// A table whose contents are synchronized from template data
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Table name; must match a subdirectory of `templates_dir`
    pub name: String,
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_database_path() -> String {
    "strata.duckdb".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            templates_dir: default_templates_dir(),
            database: DatabaseConfig::default(),
            tables: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: every field has a default, so a
    /// project without a strata.yml gets the default layout.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(CoreError::IoWithPath {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve the migrations directory relative to `project_root`.
    pub fn migrations_dir_absolute(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.migrations_dir)
    }

    /// Resolve the templates directory relative to `project_root`.
    pub fn templates_dir_absolute(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.templates_dir)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
