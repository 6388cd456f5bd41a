use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid feed index {index} (registry has {len} feeds)")]
    InvalidFeedIndex { index: usize, len: usize },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes a feed load can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The requested index is outside the registry
    InvalidFeedIndex,
    /// The feed could not be fetched or parsed
    RetrievalFailure,
    /// The entry container could not be updated
    RenderFailure,
}

impl Error {
    /// Classify this error into the load failure it represents
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::InvalidFeedIndex { .. } => FailureKind::InvalidFeedIndex,
            Error::Http(_) | Error::FeedParse(_) | Error::InvalidUrl(_) | Error::Validation(_) => {
                FailureKind::RetrievalFailure
            }
            Error::Render(_)
            | Error::Template(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::Internal(_) => FailureKind::RenderFailure,
        }
    }

    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // HTTP errors might contain internal URLs or authentication info
            Error::Http(e) if e.is_timeout() => "External HTTP request timed out".to_string(),
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Internal(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("password") || lower.contains("secret") || lower.contains("token") {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }

            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Template(_) => "Template rendering failed".to_string(),

            Error::InvalidFeedIndex { .. }
            | Error::FeedParse(_)
            | Error::Render(_)
            | Error::Config(_)
            | Error::Validation(_) => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::InvalidFeedIndex { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Http(_) | Error::FeedParse(_) => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
