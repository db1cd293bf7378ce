//! Mapping from storage errors to [`LeaveError`].
//!
//! Contention aborts (serialization failure, deadlock, lock timeout) become
//! the retryable `ConflictingState`; everything else is `Database`.

use leavewise_core::LeaveError;
use sea_orm::{DbErr, RuntimeErr, SqlErr};

/// PostgreSQL SQLSTATE codes raised when a transaction loses a race.
const CONTENTION_SQLSTATES: [&str; 3] = [
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available
];

const CONTENTION_MESSAGES: [&str; 4] = [
    "could not serialize access",
    "deadlock detected",
    "could not obtain lock",
    "lock timeout",
];

/// Converts a storage error into a domain error.
pub fn map_db_err(err: DbErr) -> LeaveError {
    if is_contention(&err) {
        tracing::warn!(error = %err, "transaction aborted by contention");
        LeaveError::ConflictingState(err.to_string())
    } else {
        LeaveError::Database(err.to_string())
    }
}

/// True if the error is a unique-constraint violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True if the database aborted the statement because of a concurrent transaction.
pub fn is_contention(err: &DbErr) -> bool {
    if let Some(code) = sqlstate(err) {
        if CONTENTION_SQLSTATES.contains(&code.as_str()) {
            return true;
        }
    }
    let message = err.to_string().to_lowercase();
    CONTENTION_MESSAGES.iter().any(|m| message.contains(m))
}

fn sqlstate(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(e) => e
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}
