//! Unified application error type.
//! All modules (db, core, cli, server) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid hours: {0}")]
    InvalidHours(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid sort column: {0}")]
    InvalidSort(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ---------------------------
    // Resource errors
    // ---------------------------
    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{kind} #{id} is still referenced by time entries")]
    InUse { kind: &'static str, id: i64 },

    #[error("Locked: {0}")]
    Locked(String),

    // ---------------------------
    // Access errors
    // ---------------------------
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        AppError::NotFound { kind, id }
    }
}

pub type AppResult<T> = Result<T, AppError>;
