//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use st_core::config::CONFIG_FILENAME;
use st_core::Config;
use st_db::DuckDbBackend;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Project context resolved from global args: parsed config plus the root
/// all configured directories are relative to.
pub(crate) struct ProjectContext {
    pub config: Config,
    pub root: PathBuf,
}

impl ProjectContext {
    /// Load the config from `--config` or `<project-dir>/strata.yml`.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config_path = match &global.config {
            Some(path) => PathBuf::from(path),
            None => root.join(CONFIG_FILENAME),
        };

        let mut config = Config::load(&config_path).context("Failed to load config")?;

        // Command-line overrides win over strata.yml. Absolute override
        // paths pass through untouched since join replaces on absolute.
        if let Some(dir) = &global.migrations_dir {
            config.migrations_dir = dir.clone();
        }
        if let Some(dir) = &global.templates_dir {
            config.templates_dir = dir.clone();
        }

        Ok(Self { config, root })
    }

    /// Resolved migrations directory
    pub fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.root)
    }

    /// Resolved templates directory
    pub fn templates_dir(&self) -> PathBuf {
        self.config.templates_dir_absolute(&self.root)
    }

    /// Open the database, honoring the `--database` override.
    pub fn open_database(&self, global: &GlobalArgs) -> Result<DuckDbBackend> {
        let db_path = match global.database.as_deref() {
            Some(path) => path.to_string(),
            None if Path::new(&self.config.database.path).is_absolute()
                || self.config.database.path == ":memory:" =>
            {
                self.config.database.path.clone()
            }
            None => self.root.join(&self.config.database.path).display().to_string(),
        };

        DuckDbBackend::new(&db_path).context("Failed to connect to database")
    }
}

/// Ask for confirmation on stdin; only a literal "yes" confirms.
pub(crate) fn confirm(prompt: &str) -> bool {
    print!("{prompt}");
    std::io::stdout().flush().ok();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim() == "yes"
}

/// Format a message in green (success)
pub(crate) fn green(msg: &str) -> String {
    format!("\x1b[32m{msg}\x1b[0m")
}

/// Format a message in yellow (warning)
pub(crate) fn yellow(msg: &str) -> String {
    format!("\x1b[33m{msg}\x1b[0m")
}

/// Format a message in red (error)
pub(crate) fn red(msg: &str) -> String {
    format!("\x1b[31m{msg}\x1b[0m")
}

/// Format a message in cyan (emphasis)
pub(crate) fn cyan(msg: &str) -> String {
    format!("\x1b[36m{msg}\x1b[0m")
}
