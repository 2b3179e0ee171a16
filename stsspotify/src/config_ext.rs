//! Extension pour intégrer Spotify dans stsconfig
//!
//! Le jeton d'accès peut venir du fichier de configuration
//! (`sources.spotify.access_token`) ou de la variable d'environnement
//! `SPOTIFY_ACCESS_TOKEN`.
//!
//! # Exemple
//!
//! ```no_run
//! use stsspotify::{SpotifyClient, SpotifyConfigExt};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = stsconfig::init_config("")?;
//! let client = SpotifyClient::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

use crate::client::{SpotifyClient, DEFAULT_API_BASE};
use anyhow::{anyhow, Result};
use serde_yaml::Value;
use std::time::Duration;
use stsconfig::Config;

/// Environment variable consulted when no token is configured
pub const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";

/// Trait d'extension pour la configuration Spotify
pub trait SpotifyConfigExt {
    /// URL de base de la Web API (défaut : `https://api.spotify.com/v1`)
    fn get_spotify_api_base(&self) -> Result<String>;
    fn set_spotify_api_base(&self, url: &str) -> Result<()>;

    /// Jeton OAuth
    ///
    /// # Errors
    ///
    /// Retourne une erreur si aucun jeton n'est configuré ni présent dans
    /// l'environnement.
    fn get_spotify_access_token(&self) -> Result<String>;
    fn set_spotify_access_token(&self, token: &str) -> Result<()>;

    /// Marché optionnel (code pays)
    fn get_spotify_market(&self) -> Option<String>;
}

impl SpotifyConfigExt for Config {
    fn get_spotify_api_base(&self) -> Result<String> {
        match self.get_value(&["sources", "spotify", "api_base"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_spotify_api_base(DEFAULT_API_BASE)?;
                Ok(DEFAULT_API_BASE.to_string())
            }
        }
    }

    fn set_spotify_api_base(&self, url: &str) -> Result<()> {
        self.set_value(
            &["sources", "spotify", "api_base"],
            Value::String(url.to_string()),
        )
    }

    fn get_spotify_access_token(&self) -> Result<String> {
        self.get_string_or_env(&["sources", "spotify", "access_token"], ACCESS_TOKEN_ENV)
            .ok_or_else(|| {
                anyhow!(
                    "No Spotify access token: set sources.spotify.access_token or {}",
                    ACCESS_TOKEN_ENV
                )
            })
    }

    fn set_spotify_access_token(&self, token: &str) -> Result<()> {
        self.set_value(
            &["sources", "spotify", "access_token"],
            Value::String(token.to_string()),
        )
    }

    fn get_spotify_market(&self) -> Option<String> {
        let market = self.get_string_or(&["sources", "spotify", "market"], "");
        (!market.is_empty()).then_some(market)
    }
}

impl SpotifyClient {
    /// Builds a client from the `sources.spotify` section
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = SpotifyClient::builder()
            .api_base(config.get_spotify_api_base()?)
            .access_token(config.get_spotify_access_token()?)
            .timeout(Duration::from_secs(config.get_http_timeout_secs()?));

        if let Some(market) = config.get_spotify_market() {
            builder = builder.market(market);
        }

        Ok(builder.build()?)
    }
}
