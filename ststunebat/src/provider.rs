//! StatsProvider implementation backed by Tunebat

use crate::client::TunebatClient;
use async_trait::async_trait;
use stswatcher::{StatsProvider, TrackStats};

#[async_trait]
impl StatsProvider for TunebatClient {
    async fn track_stats(&self, track_id: &str) -> stswatcher::Result<TrackStats> {
        Ok(self.lookup(track_id).await?)
    }
}
