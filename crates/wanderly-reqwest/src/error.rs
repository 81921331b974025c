//! Error types for wanderly-reqwest.

use thiserror::Error;

/// Result type alias for wanderly-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for wanderly-reqwest operations.
///
/// Only transport-level failures end up here. A response with a non-2xx
/// status is still a successful request from the client's point of view.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The base URL or endpoint could not be turned into a valid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Reqwest(err) if err.is_timeout())
    }

    /// Returns `true` if the connection to the API could not be established.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Reqwest(err) if err.is_connect())
    }

    /// Short, non-sensitive description used in logs and user messages.
    pub fn summary(&self) -> &'static str {
        if self.is_timeout() {
            "Request timed out"
        } else if self.is_connect() {
            "Connection failed"
        } else {
            match self {
                Self::Reqwest(_) => "Request failed",
                Self::Serde(_) => "Invalid payload",
                Self::Url(_) => "Invalid endpoint",
            }
        }
    }
}
