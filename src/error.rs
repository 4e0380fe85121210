//! Error types for the cache layer
//!
//! Backend failures are modelled explicitly with thiserror and absorbed by the
//! facade; API errors are only produced by the admin HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Backend Error Enum ==
/// Failure reported by a key-value backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend could not be reached or refused the operation
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Internal lock was poisoned by a panicking writer
    #[error("Backend lock poisoned")]
    LockPoisoned,

    /// Optional capability not provided by this backend
    #[error("Operation not supported by backend: {0}")]
    Unsupported(&'static str),

    /// Envelope could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl<T> From<std::sync::PoisonError<T>> for BackendError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        BackendError::LockPoisoned
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

// == API Error Enum ==
/// Error returned by the admin HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_poison_error_maps_to_lock_poisoned() {
        let lock = Arc::new(Mutex::new(0));
        let cloned = Arc::clone(&lock);
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err: BackendError = lock.lock().unwrap_err().into();
        assert!(matches!(err, BackendError::LockPoisoned));
    }

    #[test]
    fn test_api_error_status_codes() {
        let not_found = ApiError::NotFound("k".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
