//! Error types for cover downloads

use stswatcher::WatchError;

/// Result type alias for cover operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The image host answered with a non-success status
    #[error("Image host returned HTTP {0}")]
    Status(u16),

    /// IO error while probing the bytes
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The header could not be read
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Not a format we recognise
    #[error("Unrecognised image format")]
    UnsupportedFormat,

    /// Empty body
    #[error("Empty image body")]
    Empty,

    /// Body larger than the configured limit
    #[error("Image too large: {0} bytes")]
    TooLarge(usize),
}

impl From<Error> for WatchError {
    fn from(e: Error) -> Self {
        match e {
            Error::Image(_) | Error::UnsupportedFormat | Error::Empty => {
                WatchError::parse(e.to_string())
            }
            _ => WatchError::fetch(e.to_string()),
        }
    }
}
