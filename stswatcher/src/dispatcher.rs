//! Display refresh for one detected change
//!
//! The dispatcher pushes a snapshot through the display in a fixed order:
//!
//! 1. track text (or the idle placeholders),
//! 2. cover art and track stats, fetched concurrently,
//! 3. AI suggestions, once the stats are known,
//! 4. commit of the observed state.
//!
//! A failure in an enrichment step only degrades that step. A failure while
//! showing the track text aborts the refresh and leaves the observed state
//! untouched, so the next tick detects the change again.

use crate::differ::Change;
use crate::error::{Result, WatchError};
use crate::model::{
    CoverArt, Enrichment, ObservedState, PlaybackSnapshot, SuggestionRequest, TrackStats,
};
use crate::provider::{CoverFetcher, Display, StatsProvider, SuggestionProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// What happened to a single refresh step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// Disabled, or nothing to do for this snapshot
    Skipped,
    Failed,
}

/// Outcome of a dispatched refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub cover: StepOutcome,
    pub stats: StepOutcome,
    pub suggestions: StepOutcome,
}

impl RefreshReport {
    fn idle() -> Self {
        Self {
            cover: StepOutcome::Skipped,
            stats: StepOutcome::Skipped,
            suggestions: StepOutcome::Skipped,
        }
    }
}

/// Carries detected changes through to the display
pub struct Dispatcher {
    display: Arc<dyn Display>,
    covers: Option<Arc<dyn CoverFetcher>>,
    stats: Option<Arc<dyn StatsProvider>>,
    suggestions: Option<Arc<dyn SuggestionProvider>>,
    observed: RwLock<ObservedState>,
}

impl Dispatcher {
    /// Dispatcher with no enrichment collaborators
    pub fn new(display: Arc<dyn Display>) -> Self {
        Self {
            display,
            covers: None,
            stats: None,
            suggestions: None,
            observed: RwLock::new(ObservedState::new()),
        }
    }

    pub fn with_covers(mut self, covers: Arc<dyn CoverFetcher>) -> Self {
        self.covers = Some(covers);
        self
    }

    pub fn with_stats(mut self, stats: Arc<dyn StatsProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Arc<dyn SuggestionProvider>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn display(&self) -> &Arc<dyn Display> {
        &self.display
    }

    /// Copy of the currently committed state
    pub async fn observed_state(&self) -> ObservedState {
        self.observed.read().await.clone()
    }

    /// Refreshes the display for `snapshot` and commits it.
    ///
    /// Returns an error only when the track text could not be shown; the
    /// observed state is then left as it was.
    pub async fn dispatch(&self, snapshot: &PlaybackSnapshot) -> Result<RefreshReport> {
        let started = Instant::now();

        if !snapshot.is_playing() {
            self.display.show_idle()?;
            if let Err(e) = self.display.hide_cover() {
                warn!("Failed to hide cover: {}", e);
            }
            self.commit(snapshot).await;
            debug!("Display reset to idle in {:?}", started.elapsed());
            return Ok(RefreshReport::idle());
        }

        self.display.show_track(snapshot)?;

        let (cover, (stats, stats_outcome)) =
            tokio::join!(self.refresh_cover(snapshot), self.fetch_stats(snapshot));

        let (suggestions, suggestions_outcome) =
            self.fetch_suggestions(snapshot, stats.as_ref()).await;

        let enrichment = Enrichment::new(stats, suggestions);
        if let Err(e) = self.display.show_enrichment(&enrichment) {
            warn!("Failed to show enrichment: {}", e);
        }

        self.commit(snapshot).await;

        info!(
            "Refreshed display for '{}' by {} in {:?}",
            snapshot.track_name(),
            snapshot.artists_display(),
            started.elapsed()
        );

        Ok(RefreshReport {
            cover,
            stats: stats_outcome,
            suggestions: suggestions_outcome,
        })
    }

    async fn commit(&self, snapshot: &PlaybackSnapshot) {
        *self.observed.write().await = ObservedState::committed_from(snapshot);
    }

    async fn refresh_cover(&self, snapshot: &PlaybackSnapshot) -> StepOutcome {
        let (Some(covers), Some(url)) = (&self.covers, snapshot.album_art_url()) else {
            // Pas d'image : on n'affiche pas celle du morceau précédent
            self.hide_cover();
            return StepOutcome::Skipped;
        };

        match covers.fetch_cover(url).await {
            Ok(cover) => self.show_cover(&cover),
            Err(e) => {
                warn!("Cover fetch failed for {}: {}", url, e);
                self.hide_cover();
                StepOutcome::Failed
            }
        }
    }

    fn show_cover(&self, cover: &CoverArt) -> StepOutcome {
        match self.display.show_cover(cover) {
            Ok(()) => StepOutcome::Done,
            Err(e) => {
                warn!("Failed to show cover: {}", e);
                StepOutcome::Failed
            }
        }
    }

    fn hide_cover(&self) {
        if let Err(e) = self.display.hide_cover() {
            warn!("Failed to hide cover: {}", e);
        }
    }

    async fn fetch_stats(&self, snapshot: &PlaybackSnapshot) -> (Option<TrackStats>, StepOutcome) {
        let (Some(stats), Some(track_id)) = (&self.stats, snapshot.track_id()) else {
            return (None, StepOutcome::Skipped);
        };

        match stats.track_stats(track_id).await {
            Ok(track_stats) => {
                debug!("Stats for {}: {}", track_id, track_stats.label());
                (Some(track_stats), StepOutcome::Done)
            }
            Err(e) => {
                warn!("Stats lookup failed for {}: {}", track_id, e);
                (None, StepOutcome::Failed)
            }
        }
    }

    async fn fetch_suggestions(
        &self,
        snapshot: &PlaybackSnapshot,
        stats: Option<&TrackStats>,
    ) -> (Option<Vec<String>>, StepOutcome) {
        let Some(provider) = &self.suggestions else {
            return (None, StepOutcome::Skipped);
        };

        let request = SuggestionRequest::new(snapshot, stats);
        match provider.suggestions(&request).await {
            Ok(list) => (Some(list), StepOutcome::Done),
            Err(e) => {
                warn!("Suggestions failed for '{}': {}", snapshot.track_name(), e);
                (None, StepOutcome::Failed)
            }
        }
    }
}

/// Runs a dispatch and folds the change into the log line, used by the poller
pub(crate) async fn dispatch_change(
    dispatcher: &Dispatcher,
    change: Change,
    snapshot: &PlaybackSnapshot,
) -> Result<RefreshReport> {
    debug!("Dispatching {:?}", change);
    dispatcher.dispatch(snapshot).await.inspect_err(|e: &WatchError| {
        warn!("Refresh for {:?} failed, will retry: {}", change, e);
    })
}
