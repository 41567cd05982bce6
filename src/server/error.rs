//! HTTP error mapping for the prediction endpoint

use crate::types::{ErrorResponse, RecordError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced to HTTP clients.
///
/// Only two kinds exist: client input errors (400) and everything else (500).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is missing required input
    #[error("{0}")]
    BadRequest(String),

    /// Any other failure, reported with its text
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_maps_to_bad_request() {
        let err = ApiError::from(RecordError::MissingKey("sex"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing key: sex in JSON request");
    }

    #[test]
    fn test_coercion_failure_maps_to_internal() {
        let err = ApiError::from(RecordError::NotFinite { key: "age" });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_maps_to_internal() {
        let err = ApiError::from(anyhow::anyhow!("model exploded"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "model exploded");
    }
}
