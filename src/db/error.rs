use thiserror::Error;

/// Storage-layer failures.
///
/// Authorization denials never surface here; a lookup that finds nothing
/// returns `Ok(None)` or `NotFound`, and a missing grant row is always
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum DbError {
    /// No database section in the configuration; only the pure decision
    /// functions are usable.
    #[error("No database configured")]
    NotConfigured,

    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was hit (tenant slug, user email, one
    /// knowledge base per bot, one grant row per pair).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[cfg(feature = "database-sqlite")]
    #[error("Query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[cfg(feature = "database-sqlite")]
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;
