//! Error types for the Biblion ledger core

use thiserror::Error;

/// Main application error type.
///
/// Every variant except `Database` is a clean rejection: the call failed
/// before any write happened. A `Database` failure aborts the in-flight
/// transaction, so no partial write is ever visible either.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Item unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Already returned: {0}")]
    AlreadyReturned(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
