//! Shared Diesel/pool error mapping for the persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// Flatten a [`PoolError`] to its message, for adapters that fold both pool
/// variants into a single connection error.
pub fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error as a connection failure or a generic query
/// failure, logging the underlying detail either way.
pub fn diesel_error_message(error: diesel::result::Error, context: &str) -> (bool, String) {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), context, "diesel operation failed");
        }
        _ => debug!(context, %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (true, format!("{context}: database connection error"))
        }
        other => (false, format!("{context}: {other}")),
    }
}
