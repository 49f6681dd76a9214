use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures of the notification dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Missing env var: FIREBASE_CREDENTIALS_BASE64")]
    MissingCredentials,

    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Token exchange failed: {0}")]
    Auth(String),

    /// Carries the provider's raw response body.
    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Swap server-side detail for a generic message, keeping the status.
    pub fn redact(self, expose_details: bool) -> Self {
        if expose_details || self.status().is_client_error() {
            return self;
        }
        tracing::error!(error = %self, "redacting error details from response");
        AppError::Internal("Internal server error".into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        tracing::error!(%status, error = %self);

        match self {
            AppError::NotFound(message) => (status, message).into_response(),
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
