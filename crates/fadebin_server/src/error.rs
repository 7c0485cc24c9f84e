//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fadebin_core::AppError;
use serde_json::json;

/// Wrapper turning [`AppError`] into an HTTP response.
///
/// Validation errors carry a human-readable reason and the offending field;
/// not-found responses carry no distinguishing detail (expired, exhausted,
/// corrupt, and unknown are deliberately indistinguishable); everything else
/// collapses to a generic server fault with the detail kept in the logs.
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Invalid {field}: {message}"), "field": field }),
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            err => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
