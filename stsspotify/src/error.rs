//! Error types for the Spotify client

use stswatcher::WatchError;

/// Result type alias for Spotify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the Spotify client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API answered with a non-success status
    #[error("Spotify API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Access token expired or revoked
    #[error("Access token rejected by Spotify")]
    Unauthorized,

    /// Too many requests
    #[error("Rate limited by Spotify")]
    RateLimited,

    /// No access token given to the builder
    #[error("No Spotify access token configured")]
    MissingToken,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<Error> for WatchError {
    fn from(e: Error) -> Self {
        match e {
            Error::Json(_) => WatchError::parse(e.to_string()),
            _ => WatchError::fetch(e.to_string()),
        }
    }
}
