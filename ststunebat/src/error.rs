//! Error types for the Tunebat client

use stswatcher::WatchError;

/// Result type alias for Tunebat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when looking up track stats
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Tunebat (or the scraping proxy) answered with a non-success status
    #[error("Tunebat returned HTTP {0}")]
    Status(u16),

    /// A labelled value is missing from the page
    #[error("Label '{0}' not found on track page")]
    MissingLabel(String),

    /// Scraping failed (HTML parsing error)
    #[error("Scraping failed: {0}")]
    ScrapingError(String),

    /// Track id Tunebat cannot know about (local files, episodes)
    #[error("Unsupported track id: {0}")]
    UnsupportedTrack(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a scraping error
    pub fn scraping_error(msg: impl Into<String>) -> Self {
        Self::ScrapingError(msg.into())
    }
}

impl From<Error> for WatchError {
    fn from(e: Error) -> Self {
        match e {
            Error::MissingLabel(_) | Error::ScrapingError(_) => WatchError::parse(e.to_string()),
            _ => WatchError::fetch(e.to_string()),
        }
    }
}
