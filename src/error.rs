use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every way a single extraction can fail.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing required query parameter: url")]
    MissingUrlParameter,
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("Media not found: {0}")]
    MediaNotFound(String),
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),
}

impl From<reqwest::Error> for ExtractError {
    fn from(error: reqwest::Error) -> Self {
        Self::UpstreamFailure(error.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(error: serde_json::Error) -> Self {
        Self::UpstreamFailure(format!("invalid JSON from upstream: {error}"))
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ExtractError> for ApiError {
    fn from(error: ExtractError) -> Self {
        // The client shows the message verbatim and never branches on the kind.
        Self::internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
