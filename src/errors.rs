//! Unified application error type.
//! All modules (db, core, report, cli) return AppError so that structural
//! failures propagate with `?` up to `main`, which prints them and exits.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Event store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Extraction / datasets
    // ---------------------------
    #[error("No input given: pass at least one event store, directory or dataset")]
    EmptyInput,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid columns: {0}")]
    InvalidColumns(String),

    #[error("Invalid group name: {0}")]
    InvalidGroup(String),

    #[error("Dataset index is not unique: {0}")]
    NonUniqueIndex(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Output errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Remote error: {0}")]
    Remote(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
