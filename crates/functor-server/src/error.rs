//! Error types for the Functor Engine API server.
//!
//! [`ApiError`] unifies all request failure modes into a single enum that
//! converts into an Axum HTTP response carrying `{error, status}` via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use functor_engine::EngineError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No language model credential is configured.
    #[error("engine not initialized: no language model credential configured")]
    EngineUnavailable,

    /// The engine failed to serve the request.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The request body failed field validation.
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The request body was not valid JSON of the expected shape.
    #[error("invalid request body: {message}")]
    InvalidBody {
        /// Status chosen by the JSON extractor.
        status: StatusCode,
        /// Rejection text.
        message: String,
    },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::EngineUnavailable | Self::Engine(EngineError::ServiceUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Engine(EngineError::MalformedExtraction(_)) => StatusCode::BAD_GATEWAY,
            Self::Engine(EngineError::Template(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidBody { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
