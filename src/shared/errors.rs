use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    /// A request referenced state that cannot be acted upon, e.g. stopping
    /// a transaction that does not exist or is already closed.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage call timed out after {0:?}")]
    StorageTimeout(Duration),

    #[error("Session for charge point {0} is closed")]
    SessionClosed(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    ///
    /// Transient failures leave all entities unmodified.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::Storage(_) | DomainError::StorageTimeout(_) | DomainError::SessionClosed(_)
        )
    }

    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(format!("Database error: {}", e))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_are_transient() {
        assert!(DomainError::Storage("disk full".into()).is_transient());
        assert!(DomainError::StorageTimeout(Duration::from_secs(1)).is_transient());
    }

    #[test]
    fn integrity_violation_is_not_transient() {
        let err = DomainError::IntegrityViolation("transaction 7 is already stopped".into());
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "Integrity violation: transaction 7 is already stopped"
        );
    }

    #[test]
    fn not_found_formats_entity_and_key() {
        let err = DomainError::not_found("Reservation", "id", 42);
        assert_eq!(err.to_string(), "Not found: Reservation with id=42");
    }

    #[test]
    fn db_errors_map_to_storage() {
        let err: DomainError = sea_orm::DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, DomainError::Storage(_)));
        assert!(err.is_transient());
    }
}
