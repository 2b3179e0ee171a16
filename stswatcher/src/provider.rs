//! Collaborator traits
//!
//! The watcher never talks HTTP itself. Each external service sits behind
//! one of these traits, implemented in its own crate (`stsspotify`,
//! `ststunebat`, `stsopenai`, `stscovers`) and swapped for fakes in tests.

use crate::error::Result;
use crate::model::{CoverArt, Enrichment, PlaybackSnapshot, SuggestionRequest, TrackStats, WatchStatus};
use async_trait::async_trait;

/// Source of the current playback state
#[async_trait]
pub trait PlaybackProvider: Send + Sync {
    /// Reads the playback state once.
    ///
    /// An idle player may be reported either as an idle snapshot or as
    /// [`WatchError::NoActiveTrack`](crate::WatchError::NoActiveTrack); the
    /// poller treats both the same way.
    async fn current_playback(&self) -> Result<PlaybackSnapshot>;
}

/// Downloads album artwork
#[async_trait]
pub trait CoverFetcher: Send + Sync {
    async fn fetch_cover(&self, url: &str) -> Result<CoverArt>;
}

/// Looks up key and tempo for a track
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn track_stats(&self, track_id: &str) -> Result<TrackStats>;
}

/// Proposes similar songs
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Returns exactly three human readable suggestions
    async fn suggestions(&self, request: &SuggestionRequest) -> Result<Vec<String>>;
}

/// Presentation sink
///
/// Implementations must be cheap and non blocking: they are called from the
/// refresh task. Console, GUI or test recorders all fit here.
pub trait Display: Send + Sync {
    /// Shows the track name and artists of a playing snapshot
    ///
    /// Cover and enrichment of the previous track must not stay visible:
    /// they are shown again once fetched for this one.
    fn show_track(&self, snapshot: &PlaybackSnapshot) -> Result<()>;

    /// Resets the whole panel to its not-playing placeholders
    fn show_idle(&self) -> Result<()>;

    fn show_cover(&self, cover: &CoverArt) -> Result<()>;

    fn hide_cover(&self) -> Result<()>;

    fn show_enrichment(&self, enrichment: &Enrichment) -> Result<()>;

    fn show_status(&self, status: &WatchStatus) -> Result<()>;
}
