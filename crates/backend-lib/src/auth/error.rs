//! Errors surfaced by the auth core.
use thiserror::Error;

use super::jwt::TokenError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Bad credentials, or an invalid, expired or revoked token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed: {0}")]
    Malformed(String),

    /// Persistence failed. Carried as-is so the caller can log it.
    #[error("Store error: {0}")]
    Store(#[source] StorageError),

    /// Hashing, signing or entropy failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => AuthError::NotFound(what),
            other => AuthError::Store(other),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AuthError::Internal(msg),
            TokenError::Malformed(msg) => AuthError::Malformed(msg),
            other => AuthError::Unauthorized(other.to_string()),
        }
    }
}
