//! Extension pour intégrer Tunebat dans stsconfig

use crate::client::{TunebatClient, DEFAULT_BASE_URL, DEFAULT_SCRAPER_API_BASE};
use anyhow::Result;
use serde_yaml::Value;
use std::time::Duration;
use stsconfig::Config;

/// Environment variable consulted when no ScraperAPI key is configured
pub const SCRAPER_API_KEY_ENV: &str = "SCRAPER_API_KEY";

/// Trait d'extension pour la configuration Tunebat
///
/// Sans clé ScraperAPI, les pages sont demandées directement à Tunebat.
pub trait TunebatConfigExt {
    fn get_tunebat_base_url(&self) -> Result<String>;
    fn set_tunebat_base_url(&self, url: &str) -> Result<()>;

    fn get_tunebat_scraper_api_base(&self) -> Result<String>;

    /// Clé ScraperAPI (config ou `SCRAPER_API_KEY`)
    fn get_tunebat_scraper_api_key(&self) -> Option<String>;
    fn set_tunebat_scraper_api_key(&self, key: &str) -> Result<()>;
}

impl TunebatConfigExt for Config {
    fn get_tunebat_base_url(&self) -> Result<String> {
        match self.get_value(&["sources", "tunebat", "base_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_tunebat_base_url(DEFAULT_BASE_URL)?;
                Ok(DEFAULT_BASE_URL.to_string())
            }
        }
    }

    fn set_tunebat_base_url(&self, url: &str) -> Result<()> {
        self.set_value(
            &["sources", "tunebat", "base_url"],
            Value::String(url.to_string()),
        )
    }

    fn get_tunebat_scraper_api_base(&self) -> Result<String> {
        Ok(self.get_string_or(
            &["sources", "tunebat", "scraper_api_base"],
            DEFAULT_SCRAPER_API_BASE,
        ))
    }

    fn get_tunebat_scraper_api_key(&self) -> Option<String> {
        self.get_string_or_env(
            &["sources", "tunebat", "scraper_api_key"],
            SCRAPER_API_KEY_ENV,
        )
    }

    fn set_tunebat_scraper_api_key(&self, key: &str) -> Result<()> {
        self.set_value(
            &["sources", "tunebat", "scraper_api_key"],
            Value::String(key.to_string()),
        )
    }
}

impl TunebatClient {
    /// Builds a client from the `sources.tunebat` section
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = TunebatClient::builder()
            .base_url(config.get_tunebat_base_url()?)
            .scraper_api_base(config.get_tunebat_scraper_api_base()?)
            .timeout(Duration::from_secs(
                config.get_http_timeout_secs()?.max(crate::client::DEFAULT_TIMEOUT_SECS),
            ));

        if let Some(key) = config.get_tunebat_scraper_api_key() {
            builder = builder.scraper_api_key(key);
        }

        Ok(builder.build()?)
    }
}
