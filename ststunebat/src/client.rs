//! HTTP client for Tunebat track pages

use crate::error::{Error, Result};
use crate::parser::parse_track_stats;
use reqwest::Client;
use std::time::Duration;
use stswatcher::TrackStats;
use tracing::debug;
use url::Url;

/// Default track page prefix, the Spotify track id is appended
pub const DEFAULT_BASE_URL: &str = "https://tunebat.com/Info/_/";

/// Default ScraperAPI endpoint
pub const DEFAULT_SCRAPER_API_BASE: &str = "http://api.scraperapi.com";

/// Default timeout for HTTP requests (proxied scraping is slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "spotistats/0.1.0";

/// Scraping proxy fetching pages on our behalf
#[derive(Debug, Clone)]
pub struct ScraperProxy {
    pub api_base: String,
    pub api_key: String,
}

/// Tunebat client
///
/// # Example
///
/// ```no_run
/// use ststunebat::TunebatClient;
///
/// # async fn run() -> ststunebat::Result<()> {
/// let client = TunebatClient::builder()
///     .scraper_api_key("xxxx")
///     .build()?;
/// let stats = client.lookup("0DiWol3AO6WpXZgp0goxAV").await?;
/// println!("{}", stats.label());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TunebatClient {
    client: Client,
    base_url: String,
    scraper: Option<ScraperProxy>,
}

impl TunebatClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Tunebat page of a track
    pub fn page_url(&self, track_id: &str) -> Result<Url> {
        let track_id = track_id.trim();
        if track_id.is_empty()
            || !track_id.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::UnsupportedTrack(track_id.to_string()));
        }
        Ok(Url::parse(&format!("{}{}", self.base_url, track_id))?)
    }

    /// URL actually requested: the page itself, or the page through the proxy
    pub fn request_url(&self, track_id: &str) -> Result<Url> {
        let page = self.page_url(track_id)?;
        match &self.scraper {
            None => Ok(page),
            Some(proxy) => {
                let mut url = Url::parse(&proxy.api_base)?;
                url.query_pairs_mut()
                    .append_pair("api_key", &proxy.api_key)
                    .append_pair("url", page.as_str());
                Ok(url)
            }
        }
    }

    /// Downloads the raw HTML of a track page
    pub async fn fetch_page(&self, track_id: &str) -> Result<String> {
        let url = self.request_url(track_id)?;
        debug!("Fetching Tunebat page for {}", track_id);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Key and BPM of a Spotify track
    pub async fn lookup(&self, track_id: &str) -> Result<TrackStats> {
        let html = self.fetch_page(track_id).await?;
        parse_track_stats(&html)
    }
}

/// Builder for [`TunebatClient`]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    scraper_api_base: String,
    scraper_api_key: Option<String>,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            scraper_api_base: DEFAULT_SCRAPER_API_BASE.to_string(),
            scraper_api_key: None,
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

    /// Set the track page prefix
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Route requests through ScraperAPI with this key
    pub fn scraper_api_key(mut self, key: impl Into<String>) -> Self {
        self.scraper_api_key = Some(key.into());
        self
    }

    /// Set the scraping proxy endpoint
    pub fn scraper_api_base(mut self, url: impl Into<String>) -> Self {
        self.scraper_api_base = url.into();
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

    /// Set an HTTP proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TunebatClient> {
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

        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let scraper = self
            .scraper_api_key
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| ScraperProxy {
                api_base: self.scraper_api_base,
                api_key,
            });

        Ok(TunebatClient {
            client,
            base_url,
            scraper,
        })
    }
}
