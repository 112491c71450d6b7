// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Store(#[source] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "AUTH_001",
            AppError::Forbidden(_) => "AUTH_002",
            AppError::NotFound(_) => "NF_001",
            AppError::Conflict(_) => "CONF_001",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Store(_) => "STORE_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Authentication failed".to_string(),
            AppError::Forbidden(_) => "Operation not permitted".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Conflict(_) => "Resource already exists".to_string(),
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::Store(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }

    /// Message sent to the client. Client errors keep their detail; auth and
    /// server failures only ever expose the sanitized text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InvalidInput(msg) => msg.clone(),
            _ => self.sanitized_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            error!(code = error_code, error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": self.public_message(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized(msg) | AuthError::Malformed(msg) => AppError::Unauthorized(msg),
            AuthError::NotFound(msg) => AppError::NotFound(msg),
            AuthError::Store(e) => AppError::Store(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            StorageError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Store(other),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidEmail(msg)
            | ValidationError::InvalidPassword(msg)
            | ValidationError::InvalidChirp(msg) => AppError::InvalidInput(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::io::{Error as IoError, ErrorKind};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Unauthorized("bad token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("not yours".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("chirp".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("email".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidInput("too long".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_error_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).error_code(), "AUTH_001");
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "AUTH_002");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NF_001");
        assert_eq!(AppError::Internal(String::new()).error_code(), "INT_001");
    }

    #[test]
    fn test_error_from_impls() {
        let err: AppError = AuthError::Malformed("garbage".to_string()).into();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err: AppError = AuthError::NotFound("refresh token".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = StorageError::Conflict("email already registered".to_string()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let io = IoError::new(ErrorKind::PermissionDenied, "denied");
        let err: AppError = StorageError::Io(io).into();
        assert!(matches!(err, AppError::Store(_)));

        let err: AppError = ValidationError::InvalidChirp("Chirp is too long".to_string()).into();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Chirp is too long"));
    }

    #[tokio::test]
    async fn test_client_error_keeps_detail() {
        let response = AppError::InvalidInput("Chirp is too long".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VAL_001");
        assert_eq!(body["error"]["message"], "Chirp is too long");
    }

    #[tokio::test]
    async fn test_auth_and_store_errors_are_sanitized() {
        let response = AppError::Unauthorized("signature mismatch for key x".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Authentication failed");

        let io = IoError::new(ErrorKind::Other, "/var/lib/chirpy/users is full");
        let body = body_json(AppError::Store(StorageError::Io(io)).into_response()).await;
        assert_eq!(body["error"]["code"], "STORE_001");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }
}
