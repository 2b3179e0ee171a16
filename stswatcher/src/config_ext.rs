//! Extension pour intégrer la configuration du watcher dans stsconfig
//!
//! Le trait `WatcherConfigExt` ajoute à `stsconfig::Config` les réglages de
//! la boucle de surveillance : cadence, backoff, rafraîchissement en tâche
//! de fond et activation des enrichissements.
//!
//! # Exemple
//!
//! ```no_run
//! use stswatcher::WatcherConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = stsconfig::init_config("")?;
//! let settings = config.watcher_settings()?;
//! println!("Polling every {:?}", settings.poll_interval);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde_yaml::{Number, Value};
use std::time::Duration;
use stsconfig::Config;
use tracing::warn;

/// Default cadence of the playback poll (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Lowest accepted poll interval (milliseconds)
pub const MIN_POLL_INTERVAL_MS: u64 = 250;
/// Highest accepted poll interval (milliseconds)
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
/// Default backoff ceiling (milliseconds)
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

/// Resolved watcher settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherSettings {
    pub poll_interval: Duration,
    pub backoff_max: Duration,
    pub background_refresh: bool,
    pub stats_enabled: bool,
    pub suggestions_enabled: bool,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            backoff_max: Duration::from_millis(DEFAULT_BACKOFF_MAX_MS),
            background_refresh: true,
            stats_enabled: true,
            suggestions_enabled: true,
        }
    }
}

/// Trait d'extension pour la configuration du watcher
///
/// Les getters persistent la valeur par défaut quand la clé est absente.
pub trait WatcherConfigExt {
    /// Intervalle de polling, borné à [250, 60000] ms
    fn get_watcher_poll_interval_ms(&self) -> Result<u64>;
    fn set_watcher_poll_interval_ms(&self, interval_ms: u64) -> Result<()>;

    /// Plafond du backoff en cas d'échecs consécutifs
    fn get_watcher_backoff_max_ms(&self) -> Result<u64>;
    fn set_watcher_backoff_max_ms(&self, max_ms: u64) -> Result<()>;

    /// `false` pour rafraîchir l'affichage dans la boucle elle-même
    fn get_watcher_background_refresh(&self) -> Result<bool>;
    fn set_watcher_background_refresh(&self, enabled: bool) -> Result<()>;

    fn get_watcher_stats_enabled(&self) -> Result<bool>;
    fn set_watcher_stats_enabled(&self, enabled: bool) -> Result<()>;

    fn get_watcher_suggestions_enabled(&self) -> Result<bool>;
    fn set_watcher_suggestions_enabled(&self, enabled: bool) -> Result<()>;

    /// Tous les réglages d'un coup
    fn watcher_settings(&self) -> Result<WatcherSettings>;
}

const POLL_INTERVAL_PATH: &[&str] = &["watcher", "poll_interval_ms"];
const BACKOFF_MAX_PATH: &[&str] = &["watcher", "backoff_max_ms"];
const BACKGROUND_REFRESH_PATH: &[&str] = &["watcher", "background_refresh"];
const STATS_ENABLED_PATH: &[&str] = &["watcher", "enrichment", "stats"];
const SUGGESTIONS_ENABLED_PATH: &[&str] = &["watcher", "enrichment", "suggestions"];

fn read_u64(config: &Config, path: &[&str]) -> Option<u64> {
    match config.get_value(path) {
        Ok(Value::Number(n)) => n.as_u64(),
        Ok(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_bool(config: &Config, path: &[&str]) -> Option<bool> {
    match config.get_value(path) {
        Ok(Value::Bool(b)) => Some(b),
        Ok(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_or_default(config: &Config, path: &[&str], default: bool) -> Result<bool> {
    match read_bool(config, path) {
        Some(b) => Ok(b),
        None => {
            config.set_value(path, Value::Bool(default))?;
            Ok(default)
        }
    }
}

impl WatcherConfigExt for Config {
    fn get_watcher_poll_interval_ms(&self) -> Result<u64> {
        match read_u64(self, POLL_INTERVAL_PATH) {
            Some(ms) => {
                let clamped = ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
                if clamped != ms {
                    warn!(
                        "Poll interval {} ms out of range, using {} ms",
                        ms, clamped
                    );
                }
                Ok(clamped)
            }
            None => {
                self.set_watcher_poll_interval_ms(DEFAULT_POLL_INTERVAL_MS)?;
                Ok(DEFAULT_POLL_INTERVAL_MS)
            }
        }
    }

    fn set_watcher_poll_interval_ms(&self, interval_ms: u64) -> Result<()> {
        self.set_value(POLL_INTERVAL_PATH, Value::Number(Number::from(interval_ms)))
    }

    fn get_watcher_backoff_max_ms(&self) -> Result<u64> {
        match read_u64(self, BACKOFF_MAX_PATH) {
            Some(ms) => Ok(ms),
            None => {
                self.set_watcher_backoff_max_ms(DEFAULT_BACKOFF_MAX_MS)?;
                Ok(DEFAULT_BACKOFF_MAX_MS)
            }
        }
    }

    fn set_watcher_backoff_max_ms(&self, max_ms: u64) -> Result<()> {
        self.set_value(BACKOFF_MAX_PATH, Value::Number(Number::from(max_ms)))
    }

    fn get_watcher_background_refresh(&self) -> Result<bool> {
        bool_or_default(self, BACKGROUND_REFRESH_PATH, true)
    }

    fn set_watcher_background_refresh(&self, enabled: bool) -> Result<()> {
        self.set_value(BACKGROUND_REFRESH_PATH, Value::Bool(enabled))
    }

    fn get_watcher_stats_enabled(&self) -> Result<bool> {
        bool_or_default(self, STATS_ENABLED_PATH, true)
    }

    fn set_watcher_stats_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(STATS_ENABLED_PATH, Value::Bool(enabled))
    }

    fn get_watcher_suggestions_enabled(&self) -> Result<bool> {
        bool_or_default(self, SUGGESTIONS_ENABLED_PATH, true)
    }

    fn set_watcher_suggestions_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(SUGGESTIONS_ENABLED_PATH, Value::Bool(enabled))
    }

    fn watcher_settings(&self) -> Result<WatcherSettings> {
        Ok(WatcherSettings {
            poll_interval: Duration::from_millis(self.get_watcher_poll_interval_ms()?),
            backoff_max: Duration::from_millis(self.get_watcher_backoff_max_ms()?),
            background_refresh: self.get_watcher_background_refresh()?,
            stats_enabled: self.get_watcher_stats_enabled()?,
            suggestions_enabled: self.get_watcher_suggestions_enabled()?,
        })
    }
}
