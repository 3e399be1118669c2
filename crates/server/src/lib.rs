//! Y-Wait Assistant Server
//!
//! Thin HTTP transport over the dialogue engine.

pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use http::create_router;
pub use crate::metrics::{init_metrics, record_error, record_request, record_turn};
pub use session::{Session, SessionManager};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] ywait_core::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ywait_config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Short label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Core(err) => err.kind(),
            ServerError::InvalidRequest(_) => "invalid_request",
            ServerError::Config(_) => "config",
            ServerError::Internal(_) => "internal",
        }
    }
}

impl From<&ServerError> for axum::http::StatusCode {
    fn from(err: &ServerError) -> Self {
        use ywait_core::Error;
        match err {
            ServerError::Core(Error::SessionNotFound(_)) => axum::http::StatusCode::NOT_FOUND,
            ServerError::Core(Error::EmptyInput) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Core(Error::CapacityExceeded(_)) => {
                axum::http::StatusCode::SERVICE_UNAVAILABLE
            },
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Config(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from(&self);
        crate::metrics::record_error(self.kind());
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
