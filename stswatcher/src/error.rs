//! Error types for the playback watcher

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors crossing the collaborator boundary
///
/// Collaborator crates keep their own detailed error enums and convert them
/// into one of these variants, which is all the poller and the dispatcher
/// need to decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    /// Network failure, timeout or non-success HTTP status
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Valid answer from the provider, but nothing is playing
    #[error("No active track")]
    NoActiveTrack,

    /// A collaborator answered with an unexpected shape
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// The presentation sink refused an update
    #[error("Display update failed: {0}")]
    Display(String),
}

impl WatchError {
    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a display error
    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }
}
