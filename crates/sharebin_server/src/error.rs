//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Handler-facing error that renders as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<sharebin_core::ValidationError> for HttpError {
    fn from(value: sharebin_core::ValidationError) -> Self {
        Self(AppError::Validation(value))
    }
}

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large.".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::StorageMessage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            AppError::Internal => {
                tracing::error!("Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharebin_core::ValidationError;

    fn status_of(err: AppError) -> (StatusCode, String) {
        HttpError(err).status_and_message()
    }

    #[test]
    fn maps_client_errors_to_their_statuses() {
        let cases = [
            (
                AppError::Validation(ValidationError::MissingFiles),
                StatusCode::BAD_REQUEST,
                "Missing the \"files\" parameter.",
            ),
            (
                AppError::BadRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
                "bad",
            ),
            (
                AppError::Unauthorized("Unauthorized".to_string()),
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
            ),
            (AppError::Forbidden, StatusCode::FORBIDDEN, "Forbidden"),
            (AppError::NotFound, StatusCode::NOT_FOUND, "Not found"),
            (
                AppError::MethodNotAllowed,
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed",
            ),
            (
                AppError::PayloadTooLarge,
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large.",
            ),
        ];
        for (err, status, message) in cases {
            assert_eq!(status_of(err), (status, message.to_string()));
        }
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let (status, message) = status_of(AppError::StorageMessage("lock poisoned".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("poisoned"));
    }
}
