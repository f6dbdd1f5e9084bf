use thiserror::Error;

/// Errors that can occur when interacting with the persistence gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated by a write.
    #[error("unique constraint violated on {table}")]
    UniqueViolation { table: &'static str },

    /// A write referenced a row that does not exist.
    #[error("foreign key constraint violated on {table}")]
    ForeignKeyViolation { table: &'static str },

    /// A check constraint rejected a written value.
    #[error("check constraint violated on {table}")]
    CheckViolation { table: &'static str },

    /// A deletion was blocked by rows that still reference the target.
    #[error("{table} row {id} is still referenced by dependent rows")]
    DependencyConflict { table: &'static str, id: i64 },

    /// The entity failed its own validation before being written.
    #[error("invalid {table} row: {reason}")]
    InvalidRow { table: &'static str, reason: String },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, StoreError>;
