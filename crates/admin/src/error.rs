//! Admin API client error types.

use thiserror::Error;

/// Errors that can occur when calling the admin endpoints.
#[derive(Debug, Error)]
pub enum AdminError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned an error response; `message` is the body text.
    #[error("admin API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Base URL did not parse.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}
