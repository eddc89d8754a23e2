//! Store-layer errors.
//!
//! Wraps `sqlx` and parsing failures; `KernelError::Database` wraps this in
//! turn so callers only ever branch on `KernelError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("datetime parse error: {0}")]
    DateTimeParseError(#[from] chrono::ParseError),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("migration failed: {0}")]
    MigrationFailed(String),

    #[error("row not found: {0}")]
    RowNotFound(String),

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}
