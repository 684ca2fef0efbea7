//! Error types for guidechat-api

use thiserror::Error;

/// Result type alias using guidechat-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum Error {
    /// Network failure, timeout, or a body that could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend reported a failure in a success response
    #[error("backend reported: {0}")]
    Backend(String),

    /// The configured base URL cannot be used to build endpoint URLs
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl Error {
    /// Create a status error, trimming long bodies to keep messages readable
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        const MAX_BODY: usize = 200;
        let body = body.into();
        let body = match body.char_indices().nth(MAX_BODY) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body,
        };
        Self::Status { status, body }
    }

    /// Whether the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }
}
