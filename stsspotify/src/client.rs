//! HTTP client for the Spotify Web API

use crate::error::{Error, Result};
use crate::models::{ApiErrorBody, CurrentPlayback};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Spotify Web API base URL
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Default timeout for HTTP requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "spotistats/0.1.0";

/// Spotify Web API client
///
/// Only reads the player state of the account owning the access token.
/// Obtaining and refreshing the token is left to the caller.
///
/// # Example
///
/// ```no_run
/// use stsspotify::SpotifyClient;
///
/// # async fn run() -> stsspotify::Result<()> {
/// let client = SpotifyClient::builder().access_token("BQD...").build()?;
/// if let Some(playback) = client.playback_state().await? {
///     println!("playing: {}", playback.is_playing);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    api_base: String,
    access_token: String,
    market: Option<String>,
}

impl SpotifyClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Reads the player state
    ///
    /// Returns `None` when no device is active (HTTP 204 or empty body).
    pub async fn playback_state(&self) -> Result<Option<CurrentPlayback>> {
        let mut url = Url::parse(&format!("{}/me/player", self.api_base))?;
        url.query_pairs_mut()
            .append_pair("additional_types", "track,episode");
        if let Some(market) = &self.market {
            url.query_pairs_mut().append_pair("market", market);
        }

        debug!("Fetching playback state: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let playback: CurrentPlayback = serde_json::from_str(&body)?;
        Ok(Some(playback))
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            // Le poller espace déjà ses appels après un échec (backoff)
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited),
            _ => {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&text)
                    .map(|body| body.error.message)
                    .unwrap_or(text);
                Err(Error::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Builder for [`SpotifyClient`]
pub struct ClientBuilder {
    client: Option<Client>,
    api_base: String,
    access_token: Option<String>,
    market: Option<String>,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: None,
            market: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the OAuth access token (`user-read-playback-state` scope)
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Restrict results to a market (ISO 3166-1 alpha-2)
    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SpotifyClient> {
        let access_token = self
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(Error::MissingToken)?;

        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::other(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        Ok(SpotifyClient {
            client,
            api_base: self.api_base,
            access_token,
            market: self.market,
        })
    }
}
