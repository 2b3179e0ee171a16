//! Playback watcher for Spotistats
//!
//! This crate holds the core of Spotistats: a polling loop that reads the
//! current playback state, detects real changes and refreshes a display with
//! the track, its cover art, its key and tempo, and a few AI suggestions.
//!
//! # Features
//!
//! - **Change detection**: pure comparison of a snapshot with the state the
//!   display reflects ([`diff`])
//! - **Ordered refresh**: text first, then cover and stats concurrently, then
//!   suggestions, then commit ([`Dispatcher`])
//! - **Single-flight**: at most one background refresh at a time
//! - **Backoff**: exponential poll delay while the provider is unreachable
//! - **Configuration Extension**: [`WatcherConfigExt`] for `stsconfig`
//!
//! External services stay behind the traits of the [`provider`] module.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stswatcher::{Dispatcher, Poller, WatcherSettings};
//! # use stswatcher::{Display, PlaybackProvider};
//! # async fn run(provider: Arc<dyn PlaybackProvider>, display: Arc<dyn Display>) {
//! let dispatcher = Dispatcher::new(display);
//! let poller = Poller::new(provider, dispatcher, WatcherSettings::default());
//! poller.run(tokio_util::sync::CancellationToken::new()).await;
//! # }
//! ```

pub mod backoff;
pub mod config_ext;
pub mod differ;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod poller;
pub mod provider;

pub use async_trait::async_trait;
pub use backoff::Backoff;
pub use config_ext::{WatcherConfigExt, WatcherSettings};
pub use differ::{diff, Change};
pub use dispatcher::{Dispatcher, RefreshReport, StepOutcome};
pub use error::{Result, WatchError};
pub use model::{
    CoverArt, Enrichment, ObservedState, PlaybackSnapshot, SuggestionRequest, TrackStats,
    WatchStatus,
};
pub use poller::{Poller, TickOutcome};
pub use provider::{CoverFetcher, Display, PlaybackProvider, StatsProvider, SuggestionProvider};
