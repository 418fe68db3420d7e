//! Custom error types for the common library
//!
//! This module defines the errors raised while setting up and talking to
//! the database, shared by both services.

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[source] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Whether a sqlx error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

/// Whether a sqlx error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_foreign_key_violation())
}

/// Looks through an `anyhow` chain for a sqlx foreign key violation
pub fn is_foreign_key_violation_in(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|e| e.downcast_ref::<SqlxError>())
        .any(is_foreign_key_violation)
}

/// Looks through an `anyhow` chain for a sqlx unique violation
pub fn is_unique_violation_in(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|e| e.downcast_ref::<SqlxError>())
        .any(is_unique_violation)
}
