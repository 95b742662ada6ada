//! Error handling utilities for repositories

use murmur_core::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check a unique violation against the constraint it landed on
///
/// Registration can race on either the username or the email key; the
/// constraint name tells the caller which conflict to report.
pub fn map_user_unique_violation(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => DomainError::EmailAlreadyExists,
                _ => DomainError::UsernameTaken,
            };
        }
    }
    DomainError::DatabaseError(e.to_string())
}
