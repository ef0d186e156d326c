//! HTTP error handling and response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_application::ComposeResponseError;
use relay_domain::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Failures surfaced to the caller as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Compose(#[from] ComposeResponseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Compose(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_client_error() {
            warn!(status = status.as_u16(), "Rejected request: {}", message);
        } else {
            error!(status = status.as_u16(), "Request failed: {}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
