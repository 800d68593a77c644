//! Conversion of service errors into HTTP responses.

use crate::currency::services::CurrencyServiceError;
use crate::error::ErrorKind;
use crate::task::services::TaskServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// Error response carrying a status code and a client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a `400 Bad Request` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_kind(kind: ErrorKind, infrastructure: StatusCode, message: String) -> Self {
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Infrastructure => infrastructure,
        };
        Self::new(status, message)
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Infrastructure {
            error!(error = %err, "task store failure");
            return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "task store unavailable");
        }
        Self::from_kind(kind, StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<CurrencyServiceError> for ApiError {
    fn from(err: CurrencyServiceError) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Infrastructure {
            warn!(error = %err, "currency upstream failure");
        }
        Self::from_kind(kind, StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
