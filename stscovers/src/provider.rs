//! CoverFetcher implementation

use crate::client::CoverClient;
use async_trait::async_trait;
use stswatcher::{CoverArt, CoverFetcher};

#[async_trait]
impl CoverFetcher for CoverClient {
    async fn fetch_cover(&self, url: &str) -> stswatcher::Result<CoverArt> {
        Ok(self.fetch(url).await?)
    }
}
