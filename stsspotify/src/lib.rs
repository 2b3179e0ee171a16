//! Spotify playback provider for Spotistats
//!
//! This crate reads the current player state of a Spotify account through
//! the Web API (`GET /me/player`) and exposes it as a
//! [`stswatcher::PlaybackProvider`].
//!
//! # Features
//!
//! - **Tracks and episodes**: podcasts report the show as artist
//! - **Local files**: identified by their `spotify:local:` uri
//! - **Typed errors**: 401, 429 and other statuses are distinguished
//! - **Configuration Extension**: [`SpotifyConfigExt`] (feature `stsconfig`)
//!
//! # Example
//!
//! ```no_run
//! use stsspotify::SpotifyClient;
//! use stswatcher::PlaybackProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SpotifyClient::builder().access_token("BQD...").build()?;
//! let snapshot = client.current_playback().await?;
//! println!("{} - {}", snapshot.track_name(), snapshot.artists_display());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod provider;

#[cfg(feature = "stsconfig")]
pub mod config_ext;

pub use client::{ClientBuilder, SpotifyClient, DEFAULT_API_BASE};
pub use error::{Error, Result};
pub use models::{CurrentPlayback, PlaybackItem};

#[cfg(feature = "stsconfig")]
pub use config_ext::SpotifyConfigExt;
