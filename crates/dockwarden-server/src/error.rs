//! Mapping of control-plane failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dockwarden_control::ControlError;
use dockwarden_runtime::EngineError;
use serde::Serialize;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A control-plane operation failed or was denied.
    Control(ControlError),
    /// The blocking worker running the operation died.
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable description.
    pub error: String,
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Control(err) => match err {
                ControlError::Authentication | ControlError::Unauthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                ControlError::Authorization { .. } | ControlError::AdminRequired => {
                    StatusCode::FORBIDDEN
                }
                ControlError::DuplicateUsername { .. } => StatusCode::CONFLICT,
                ControlError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                ControlError::Engine(engine) => match engine {
                    EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
                    EngineError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    EngineError::CommandFailed { .. }
                    | EngineError::BuildFailed { .. }
                    | EngineError::MalformedOutput { .. } => StatusCode::BAD_GATEWAY,
                },
                ControlError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Control(err) => err.to_string(),
            Self::Internal(message) => format!("internal error: {message}"),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        Self::Control(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.message(), "request failed");
        }
        (status, Json(ErrorBody { error: self.message() })).into_response()
    }
}
