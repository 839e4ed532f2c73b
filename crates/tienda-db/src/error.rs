//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! SQLite Error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module) ← adds context and categorization
//!      │
//!      ▼
//! Presentation boundary ← renders the message, offers retry
//! ```
//!
//! Absence of a single row is NOT represented here: `get_by_id` style lookups
//! return `Ok(None)`. `NotFound` exists for operations that require the row to
//! exist (none of the current public paths raise it for missing ids; updates
//! and deletes report "no row affected" as a boolean instead).

use thiserror::Error;

/// Database operation errors.
///
/// These wrap sqlx errors and provide additional context for debugging and
/// the diagnostics report.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found where the operation required it to exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// Unique constraint violation (duplicate product code, username, ...).
    #[error("Duplicate {field}: a row with this value already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation (referencing a missing category,
    /// client, product, ...).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Could not open or connect to the database.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// A remediation hint for common connectivity failures, used by the
    /// diagnostics report. `None` when there is nothing useful to suggest.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DbError::ConnectionFailed(_) => Some(
                "Check that the database path is writable and the directory exists; \
                 set TIENDA_DATABASE_PATH to relocate the database file",
            ),
            DbError::PoolExhausted => Some(
                "All pooled connections are busy; retry, or raise max_connections in DbConfig",
            ),
            DbError::MigrationFailed(_) => Some(
                "The schema on disk does not match the embedded migrations; \
                 migrations never run backwards, restore from backup or recreate the file",
            ),
            DbError::UniqueViolation { .. } => {
                Some("A row with this value already exists; pick a different value")
            }
            DbError::ForeignKeyViolation { .. } => {
                Some("The referenced row does not exist or was deactivated")
            }
            DbError::QueryFailed(msg) if msg.contains("database is locked") => Some(
                "Another process holds a write lock on the database file; \
                 close other instances and retry",
            ),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database     → analyze message for constraint type
/// sqlx::Error::PoolTimedOut → DbError::PoolExhausted
/// sqlx::Error::PoolClosed   → DbError::ConnectionFailed
/// Other                     → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                // SQLite constraint messages:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message: msg }
                } else {
                    DbError::QueryFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
