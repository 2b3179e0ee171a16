//! Error types for the OpenAI client

use stswatcher::WatchError;

/// Result type alias for OpenAI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying the model
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

    /// API returned an error status
    #[error("OpenAI API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The completion had no content
    #[error("Empty completion")]
    EmptyCompletion,

    /// The completion does not follow the requested JSON shape
    #[error("Unexpected completion: {0}")]
    InvalidShape(String),

    /// No API key given to the builder
    #[error("No OpenAI API key configured")]
    MissingApiKey,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a shape error
    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }
}

impl From<Error> for WatchError {
    fn from(e: Error) -> Self {
        match e {
            Error::Json(_) | Error::EmptyCompletion | Error::InvalidShape(_) => {
                WatchError::parse(e.to_string())
            }
            _ => WatchError::fetch(e.to_string()),
        }
    }
}
