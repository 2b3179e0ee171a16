//! SuggestionProvider implementation backed by the chat model

use crate::client::OpenAiClient;
use async_trait::async_trait;
use stswatcher::{SuggestionProvider, SuggestionRequest};

#[async_trait]
impl SuggestionProvider for OpenAiClient {
    async fn suggestions(&self, request: &SuggestionRequest) -> stswatcher::Result<Vec<String>> {
        Ok(self.similar_songs(request).await?)
    }
}
