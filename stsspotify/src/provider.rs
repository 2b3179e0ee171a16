//! PlaybackProvider implementation for Spotify

use crate::client::SpotifyClient;
use crate::models::CurrentPlayback;
use async_trait::async_trait;
use stswatcher::{PlaybackProvider, PlaybackSnapshot, WatchError};
use tracing::trace;

impl CurrentPlayback {
    /// Flattens the player state into a snapshot
    ///
    /// An item without any identity (ads) is reported as idle.
    pub fn to_snapshot(&self) -> PlaybackSnapshot {
        let Some(item) = &self.item else {
            return PlaybackSnapshot::idle();
        };
        let Some(identity) = item.identity() else {
            return PlaybackSnapshot::idle();
        };

        PlaybackSnapshot::new(
            self.is_playing,
            Some(identity.to_string()),
            item.name.clone(),
            item.artist_names(),
            item.art_url().map(str::to_string),
        )
    }
}

#[async_trait]
impl PlaybackProvider for SpotifyClient {
    async fn current_playback(&self) -> stswatcher::Result<PlaybackSnapshot> {
        let playback = self.playback_state().await?.ok_or(WatchError::NoActiveTrack)?;

        if let Some(device) = &playback.device {
            trace!(
                "Device '{}' ({}), volume {:?}",
                device.name,
                device.device_type.as_deref().unwrap_or("unknown"),
                device.volume_percent
            );
        }

        Ok(playback.to_snapshot())
    }
}
