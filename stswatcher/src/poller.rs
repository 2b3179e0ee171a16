//! Polling loop
//!
//! Every tick reads the playback state once, compares it with what the
//! display reflects and hands real changes to the [`Dispatcher`]. With
//! background refresh enabled the dispatch runs in its own task and at most
//! one refresh is in flight: a change seen meanwhile is deferred to a later
//! tick, where it is detected again against the then committed state.

use crate::backoff::Backoff;
use crate::config_ext::WatcherSettings;
use crate::differ::{diff, Change};
use crate::dispatcher::{dispatch_change, Dispatcher, RefreshReport};
use crate::error::{Result, WatchError};
use crate::model::{PlaybackSnapshot, WatchStatus};
use crate::provider::PlaybackProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// What a single tick did
#[derive(Debug)]
pub enum TickOutcome {
    Unchanged,
    /// Change dispatched inline
    Refreshed(Change, RefreshReport),
    /// Change dispatched to a background task
    Spawned(Change),
    /// Change seen while a refresh was still running
    Deferred(Change),
    /// Inline dispatch failed, nothing committed
    RefreshFailed(Change, WatchError),
    /// The playback provider could not be read
    FetchFailed(WatchError),
}

pub struct Poller {
    provider: Arc<dyn PlaybackProvider>,
    dispatcher: Arc<Dispatcher>,
    settings: WatcherSettings,
    backoff: Backoff,
    in_flight: Option<JoinHandle<Result<RefreshReport>>>,
}

impl Poller {
    pub fn new(
        provider: Arc<dyn PlaybackProvider>,
        dispatcher: Dispatcher,
        settings: WatcherSettings,
    ) -> Self {
        let backoff = Backoff::new(settings.poll_interval, settings.backoff_max);
        Self {
            provider,
            dispatcher: Arc::new(dispatcher),
            settings,
            backoff,
            in_flight: None,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Delay before the next tick, including backoff
    pub fn next_delay(&self) -> Duration {
        self.backoff.delay()
    }

    pub fn refresh_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Runs one poll cycle
    pub async fn tick(&mut self) -> TickOutcome {
        self.reap_finished().await;

        let snapshot = match self.provider.current_playback().await {
            Ok(snapshot) => snapshot,
            Err(WatchError::NoActiveTrack) => PlaybackSnapshot::idle(),
            Err(e) => return self.on_fetch_failure(e),
        };

        if self.backoff.record_success() {
            info!("Playback provider reachable again");
            self.report_status(WatchStatus::Connected);
        }

        let observed = self.dispatcher.observed_state().await;
        let change = diff(&observed, &snapshot);
        if !change.is_changed() {
            trace!("No playback change");
            return TickOutcome::Unchanged;
        }

        if self.in_flight.is_some() {
            debug!("{:?} deferred, a refresh is still running", change);
            return TickOutcome::Deferred(change);
        }

        info!(
            "Playback change {:?}: '{}' ({})",
            change,
            snapshot.track_name(),
            if snapshot.is_playing() { "playing" } else { "stopped" }
        );

        if self.settings.background_refresh {
            let dispatcher = Arc::clone(&self.dispatcher);
            self.in_flight = Some(tokio::spawn(async move {
                dispatch_change(&dispatcher, change, &snapshot).await
            }));
            TickOutcome::Spawned(change)
        } else {
            match dispatch_change(&self.dispatcher, change, &snapshot).await {
                Ok(report) => TickOutcome::Refreshed(change, report),
                Err(e) => TickOutcome::RefreshFailed(change, e),
            }
        }
    }

    /// Waits for the in-flight refresh, if any
    pub async fn settle(&mut self) -> Option<Result<RefreshReport>> {
        let handle = self.in_flight.take()?;
        Some(Self::join(handle).await)
    }

    /// Polls until `cancel` fires
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            "Watching playback every {:?} (backoff up to {:?})",
            self.settings.poll_interval, self.settings.backoff_max
        );

        loop {
            // Un tick commencé (dispatch inline compris) va à son terme
            self.tick().await;
            if cancel.is_cancelled() {
                break;
            }

            let delay = self.next_delay();
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if let Some(Err(e)) = self.settle().await {
            warn!("Last refresh did not complete: {}", e);
        }
        info!("Playback watcher stopped");
    }

    fn on_fetch_failure(&mut self, e: WatchError) -> TickOutcome {
        let failures = self.backoff.record_failure();
        warn!(
            "Playback fetch failed ({} in a row, next try in {:?}): {}",
            failures,
            self.backoff.delay(),
            e
        );
        if failures == 1 {
            self.report_status(WatchStatus::Unreachable {
                consecutive_failures: failures,
            });
        }
        TickOutcome::FetchFailed(e)
    }

    fn report_status(&self, status: WatchStatus) {
        if let Err(e) = self.dispatcher.display().show_status(&status) {
            warn!("Failed to show status {:?}: {}", status, e);
        }
    }

    async fn reap_finished(&mut self) {
        if self.in_flight.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.in_flight.take() {
                let _ = Self::join(handle).await;
            }
        }
    }

    async fn join(handle: JoinHandle<Result<RefreshReport>>) -> Result<RefreshReport> {
        match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("Refresh task panicked or was cancelled: {}", e);
                Err(WatchError::display(e.to_string()))
            }
        }
    }
}
