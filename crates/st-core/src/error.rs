//! Error types for st-core

use thiserror::Error;

/// Core error type for Strata
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Failed to parse configuration file
    #[error("[E001] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E002: Migrations directory not found
    #[error("[E002] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E003: Applied migration has no matching file on disk
    #[error(
        "[E003] Broken migration chain: migration {index} is recorded as applied \
         but no matching file exists on disk"
    )]
    BrokenChain { index: String },

    /// E004: Templates directory not found
    #[error("[E004] Templates directory not found: {path}")]
    TemplatesDirNotFound { path: String },

    /// E005: Table directory not found under the templates directory
    #[error("[E005] Table directory not found: {path}")]
    TableDirNotFound { path: String },

    /// E006: Failed to parse a template record file
    #[error("[E006] Failed to parse record {path}: {message}")]
    RecordParseError { path: String, message: String },

    /// E007: IO error
    #[error("[E007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E008: IO error with file path context
    #[error("[E008] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for [`CoreError`]
pub type CoreResult<T> = Result<T, CoreError>;
