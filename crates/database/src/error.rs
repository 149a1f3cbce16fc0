use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("The requested data was not found in the database.")]
    NotFound,

    /// A row referenced another row that does not exist.
    #[error("Foreign key constraint violation: {0}")]
    ForeignKeyViolation(String),

    /// Any other integrity constraint (unique, check, not-null) rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::ForeignKeyViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_check_violation() =>
            {
                DbError::ConstraintViolation(db_err.message().to_string())
            }
            other => DbError::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound));
    }

    #[test]
    fn other_errors_stay_unclassified() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Query(sqlx::Error::PoolTimedOut)));
        assert!(err.to_string().starts_with("Database query failed"));
    }
}
