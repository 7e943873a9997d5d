// errors.rs
use crate::store::StoreError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, listing store).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Database Error: {0}")]
    DbError(String),
    /// The database file could not be opened at all.
    #[error("Database Unavailable: {0}")]
    DbUnavailable(String),
    /// The listing store failed; the page offers a retry.
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Store(_) | ServerError::DbUnavailable(_) => 503,
            ServerError::DbError(_) | ServerError::InternalError => 500,
        }
    }
}
