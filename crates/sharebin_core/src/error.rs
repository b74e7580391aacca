//! Application error types for core storage and domain logic.
use crate::validation::ValidationError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A credential was supplied but not recognized.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No usable credential was supplied.
    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Internal server error")]
    Internal,
}
