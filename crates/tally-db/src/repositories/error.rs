//! sqlx error mapping shared by the Postgres repositories

use sqlx::Error as SqlxError;
use tally_core::DomainError;

/// Map a sqlx failure onto the domain's store error
pub fn map_db_error(e: SqlxError) -> DomainError {
    let detail = match &e {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed => format!("store unavailable: {e}"),
        SqlxError::Io(_) | SqlxError::Tls(_) => format!("store connection failed: {e}"),
        SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => format!("stored row is malformed: {e}"),
        _ => e.to_string(),
    };
    DomainError::DatabaseError(detail)
}

/// Like [`map_db_error`], but a unique-key violation becomes `on_unique()`
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        on_unique()
    } else {
        map_db_error(e)
    }
}
