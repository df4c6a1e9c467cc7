//! Error handling utilities for repositories

use community_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation to a domain error, anything else to `DatabaseError`
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    map_constraint_violation(e, |_| Some(on_unique()))
}

/// Like [`map_unique_violation`], but lets the caller pick the error from the
/// name of the violated constraint. Returning `None` falls back to
/// `DatabaseError`.
pub fn map_constraint_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> Option<DomainError>,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(mapped) = on_unique(db_err.constraint()) {
                return mapped;
            }
        }
    }
    map_db_error(e)
}

/// Whether the error is a foreign-key violation (a referenced row vanished)
pub fn is_foreign_key_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

/// Map a foreign-key violation by the name of the violated constraint.
/// Anything `on_fk` declines, and every other error, goes to `fallback`.
pub fn map_foreign_key_violation<F, G>(e: SqlxError, on_fk: F, fallback: G) -> DomainError
where
    F: FnOnce(Option<&str>) -> Option<DomainError>,
    G: FnOnce(SqlxError) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            if let Some(mapped) = on_fk(db_err.constraint()) {
                return mapped;
            }
        }
    }
    fallback(e)
}
