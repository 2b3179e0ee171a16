//! Tunebat key and tempo lookup for Spotistats
//!
//! Tunebat publishes, for every Spotify track, a page with its musical key,
//! tempo and a few audio features. This crate fetches that page, directly
//! or through ScraperAPI, and reads the figures by their caption.
//!
//! [`TunebatClient`] implements [`stswatcher::StatsProvider`].

pub mod client;
pub mod error;
pub mod parser;
pub mod provider;

#[cfg(feature = "stsconfig")]
pub mod config_ext;

pub use client::{ClientBuilder, ScraperProxy, TunebatClient};
pub use error::{Error, Result};
pub use parser::{parse_labelled_values, parse_track_stats};

#[cfg(feature = "stsconfig")]
pub use config_ext::TunebatConfigExt;
