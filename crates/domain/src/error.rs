//! Domain error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The addressed record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A named related record does not exist.
    #[error("referenced {entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    /// A store constraint or entity validation rejected the data.
    #[error("invalid data for {entity}: {reason}")]
    Constraint { entity: &'static str, reason: String },

    /// Deletion blocked by records that still depend on the target.
    #[error("{entity} {id} has dependent records and cannot be deleted")]
    DependencyConflict { entity: &'static str, id: i64 },

    /// An unexpected gateway failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Translates gateway write failures into caller-correctable errors.
    /// Anything that is not a constraint outcome stays an internal store
    /// error.
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { table } => DomainError::Constraint {
                entity: table,
                reason: "a unique constraint was violated".to_string(),
            },
            StoreError::ForeignKeyViolation { table } => DomainError::Constraint {
                entity: table,
                reason: "a referenced record does not exist".to_string(),
            },
            StoreError::CheckViolation { table } => DomainError::Constraint {
                entity: table,
                reason: "a value was rejected by a check constraint".to_string(),
            },
            StoreError::InvalidRow { table, reason } => DomainError::Constraint {
                entity: table,
                reason,
            },
            other => DomainError::Store(other),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
