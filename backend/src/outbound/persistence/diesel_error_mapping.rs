//! Translation of pool and Diesel failures into port errors.
//!
//! Both repository error enums share the `Connection`/`Query` split, so the
//! helpers take the two constructors instead of a concrete error type.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{EntryRepositoryError, UserRepositoryError};

use super::pool::PoolError;

/// Constructors for a repository error with connection and query variants.
pub(crate) trait PersistenceError: Sized {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

impl PersistenceError for EntryRepositoryError {
    fn connection(message: String) -> Self {
        EntryRepositoryError::connection(message)
    }

    fn query(message: String) -> Self {
        EntryRepositoryError::query(message)
    }
}

impl PersistenceError for UserRepositoryError {
    fn connection(message: String) -> Self {
        UserRepositoryError::connection(message)
    }

    fn query(message: String) -> Self {
        UserRepositoryError::query(message)
    }
}

/// Pool failures always mean the database is unreachable.
pub(crate) fn map_pool_error<E: PersistenceError>(error: PoolError) -> E {
    E::connection(error.into_message())
}

/// Map a Diesel error, logging the raw cause at debug level.
///
/// Closed connections become connection errors; everything else is a query
/// error with a generic message so SQL details stay out of responses.
pub(crate) fn map_diesel_error<E: PersistenceError>(error: DieselError, operation: &str) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => debug!(error = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection(format!("{operation}: database connection closed"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            E::query(format!("{operation}: unique constraint violated"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            E::query(format!("{operation}: check constraint violated"))
        }
        _ => E::query(format!("{operation}: database error")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let error: EntryRepositoryError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, EntryRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        let error: UserRepositoryError = map_diesel_error(DieselError::NotFound, "get user");
        assert_eq!(error, UserRepositoryError::query("get user: database error"));
    }

    #[rstest]
    fn rollback_is_a_query_error() {
        let error: EntryRepositoryError =
            map_diesel_error(DieselError::RollbackTransaction, "update entry");
        assert!(matches!(error, EntryRepositoryError::Query { .. }));
    }
}
