//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication endpoint returned a failing status.
    #[error("Authentication failed ({status}): {message}")]
    Authentication {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },

    /// Cohort endpoint returned a failing status.
    #[error("Cohort request failed ({status}): {message}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is an authentication error.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Check if this is a cohort request error.
    pub fn is_request(&self) -> bool {
        matches!(self, Error::Request { .. })
    }

    /// Check if this is a malformed-response error.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Error::MalformedResponse(_))
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. } | Error::Request { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the server on failing statuses.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}
