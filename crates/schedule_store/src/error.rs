//! Schedule store error types.

use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::sqlite::SqliteError;
use thiserror::Error;

/// Driver error type, re-exported for callers that need to build or match
/// on [`StoreError::Unavailable`].
pub use sqlx::Error as SqlxError;

/// SQLite primary result code for constraint failures. Extended codes keep
/// it in the low byte.
const SQLITE_CONSTRAINT: i32 = 19;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness, foreign-key, not-null or check constraint rejected the
    /// write.
    #[error("{entity} violates a constraint: {detail}")]
    ConstraintViolation {
        entity: &'static str,
        detail: String,
    },

    /// The query could not be executed.
    #[error("Database error: {0}")]
    Unavailable(#[source] sqlx::Error),
}

impl StoreError {
    /// Creates a constraint violation error.
    pub fn constraint(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            entity,
            detail: detail.into(),
        }
    }

    /// Classifies a driver error raised while operating on `entity`.
    pub(crate) fn from_sqlx(entity: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if is_integrity_error(&**db_err) {
                let detail = db_err.message().to_string();
                tracing::warn!(entity, %detail, "Constraint violation");
                return Self::constraint(entity, detail);
            }
        }
        Self::Unavailable(err)
    }

    /// Returns true if this is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// Returns true if the database rejected a statement on integrity grounds.
///
/// sqlx only names the common kinds. SQLite reports trigger-style foreign
/// key failures (`SQLITE_CONSTRAINT_TRIGGER`) and Postgres reports
/// `restrict_violation` without a dedicated kind, so the raw codes are
/// checked too.
fn is_integrity_error(db_err: &dyn DatabaseError) -> bool {
    if matches!(
        db_err.kind(),
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    ) {
        return true;
    }

    let Some(code) = db_err.code() else {
        return false;
    };
    if db_err.try_downcast_ref::<SqliteError>().is_some() {
        code.parse::<i32>()
            .is_ok_and(|code| code & 0xff == SQLITE_CONSTRAINT)
    } else {
        // SQLSTATE class 23: integrity constraint violation
        code.starts_with("23")
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_unavailable() {
        let err = StoreError::from_sqlx("Task", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_constraint_message() {
        let err = StoreError::constraint("User", "username abc already exists");
        assert_eq!(
            err.to_string(),
            "User violates a constraint: username abc already exists"
        );
    }
}
