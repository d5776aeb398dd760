use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures at the upstream boundary. Everything the Gateway can report
/// to a caller is one of these.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("TMDB read access key is not configured")]
    MissingCredential,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("TMDB API error: {status} {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected TMDB payload: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Timeouts, refused connections, rate limiting and upstream 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Transport(err) => err.is_timeout() || err.is_connect(),
            GatewayError::Upstream { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::MissingCredential
            | GatewayError::Transport(_)
            | GatewayError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Upstream { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Handler error for routes that surface gateway failures as `{error}`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Gateway(err) = &self;
        let (status, error_message): (StatusCode, String) = match err {
            err if err.is_not_found() => (StatusCode::NOT_FOUND, "Not found".to_string()),
            GatewayError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GatewayError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Movie database is not configured".to_string(),
            ),
            err => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
