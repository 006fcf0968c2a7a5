//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boothplan_core::{DenyReason, StorageError};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Storage(StorageError),
    Denied(DenyReason),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::Serialization(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::Image(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Denied(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Storage(e) => {
                if status.is_server_error() {
                    tracing::error!("{}", e);
                }
                json!({ "error": e.to_string() })
            }
            ApiError::Denied(reason) => json!({ "error": "Floor plan is not visible", "reason": reason }),
        };
        (status, Json(body)).into_response()
    }
}
