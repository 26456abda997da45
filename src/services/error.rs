use sea_orm::{DbErr, SqlErr, TransactionError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    /// The store rejected a write: a missing foreign key or a duplicate booking.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(reason))
            | Some(SqlErr::UniqueConstraintViolation(reason)) => Self::ConstraintViolation(reason),
            // SQLite reports primary key conflicts with its own extended code
            _ if err.to_string().contains("constraint failed") => {
                Self::ConstraintViolation(err.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(err) => err.into(),
            TransactionError::Transaction(err) => err,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_errors_stay_database_errors() {
        let err = ServiceError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, ServiceError::Database(_)));
    }

    #[test]
    fn test_transaction_error_is_unwrapped() {
        let err = ServiceError::from(TransactionError::Transaction(ServiceError::not_found(
            "venue", 7,
        )));
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "venue",
                id: 7
            }
        ));
        assert_eq!(err.to_string(), "venue 7 not found");
    }
}
