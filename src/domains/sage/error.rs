//! Sage gateway error types.

use thiserror::Error;

/// Result type for Sage gateway operations.
pub type SageResult<T> = Result<T, SageError>;

/// Errors raised while talking to the Sage Accounting API.
#[derive(Debug, Error)]
pub enum SageError {
    /// No access token has been configured.
    #[error("No access token configured. Set SAGE_ACCESS_TOKEN or run sage_auth to obtain one")]
    MissingAccessToken,

    /// The access token could not be refreshed.
    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// The API answered with a non-success status.
    #[error("Sage API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The OAuth token endpoint answered with a non-success status.
    #[error("Token endpoint error ({status}): {message}")]
    TokenRequest { status: u16, message: String },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl SageError {
    /// Create an API error from a status code and raw response body.
    pub fn api(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: excerpt(body),
        }
    }

    /// Create a token endpoint error from a status code and raw response body.
    pub fn token_request(status: u16, body: &str) -> Self {
        Self::TokenRequest {
            status,
            message: excerpt(body),
        }
    }

    /// Create a refresh error.
    pub fn refresh(msg: impl Into<String>) -> Self {
        Self::Refresh(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::TokenRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Longest body excerpt kept in an error message, in characters.
const EXCERPT_CHARS: usize = 500;

/// Trim a response body down to a diagnostic excerpt.
pub(crate) fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
