//! # Spotistats configuration
//!
//! One YAML document drives every crate of the workspace. It is built from
//! three layers, each one overriding the previous:
//!
//! 1. the defaults embedded in the binary (`spotistats.yaml`),
//! 2. `config.yaml` in the configuration directory,
//! 3. `SPOTISTATS_CONFIG__SECTION__KEY=value` environment variables.
//!
//! Keys are case-insensitive. The merged document is written back to
//! `config.yaml` so that users can discover every available setting.
//!
//! Crates needing their own settings extend [`Config`] with a
//! `...ConfigExt` trait (see `stswatcher::WatcherConfigExt`,
//! `stsspotify::SpotifyConfigExt`, ...).
//!
//! ```no_run
//! use stsconfig::init_config;
//!
//! let config = init_config("")?;
//! let timeout = config.get_http_timeout_secs()?;
//! let level = config.get_log_min_level()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::OnceCell;
use serde_yaml::{Mapping, Number, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

const EMBEDDED_DEFAULTS: &str = include_str!("spotistats.yaml");
const CONFIG_FILE: &str = "config.yaml";

static CONFIG: OnceCell<Arc<Config>> = OnceCell::new();

const ENV_CONFIG_DIR: &str = "SPOTISTATS_CONFIG";
const ENV_PREFIX: &str = "SPOTISTATS_CONFIG__";
const CONFIG_DIR_NAME: &str = ".spotistats";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ANSI: bool = true;

/// Typed accessor pair for an unsigned integer setting
macro_rules! u64_setting {
    ($get:ident, $set:ident, $path:expr, $default:expr) => {
        pub fn $get(&self) -> Result<u64> {
            Ok(match self.get_value($path) {
                Ok(Value::Number(n)) => n.as_u64().unwrap_or($default),
                Ok(Value::String(s)) => s.trim().parse().unwrap_or($default),
                _ => $default,
            })
        }

        pub fn $set(&self, value: u64) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(value)))
        }
    };
}

/// Typed accessor pair for a boolean setting
macro_rules! bool_setting {
    ($get:ident, $set:ident, $path:expr, $default:expr) => {
        pub fn $get(&self) -> Result<bool> {
            Ok(match self.get_value($path) {
                Ok(Value::Bool(flag)) => flag,
                _ => $default,
            })
        }

        pub fn $set(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Spotistats settings, shared between threads
#[derive(Debug)]
pub struct Config {
    dir: PathBuf,
    file: PathBuf,
    doc: RwLock<Value>,
}

impl Config {
    /// Resolves the configuration directory and makes sure it is usable
    ///
    /// Candidates, first match wins:
    /// `directory` when not empty, `$SPOTISTATS_CONFIG`, `./.spotistats`,
    /// then `~/.spotistats`. When none exists `./.spotistats` is created.
    pub fn config_dir(directory: &str) -> Result<PathBuf> {
        let dir = resolve_dir(directory);
        ensure_usable(&dir)
            .with_context(|| format!("Cannot use configuration directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Builds the layered document for `directory` and writes it back
    pub fn load_config(directory: &str) -> Result<Self> {
        let dir = Self::config_dir(directory)?;
        let file = dir.join(CONFIG_FILE);
        info!(config_dir = %dir.display(), "Using config directory");

        let mut doc = normalize_keys(serde_yaml::from_str(EMBEDDED_DEFAULTS)?);

        match fs::read_to_string(&file) {
            Ok(text) => {
                let user: Value = serde_yaml::from_str(&text)
                    .with_context(|| format!("Invalid YAML in {}", file.display()))?;
                if !user.is_null() {
                    overlay(&mut doc, normalize_keys(user));
                }
                info!(config_file = %file.display(), "Loaded config file");
            }
            Err(_) => {
                info!(config_file = %file.display(), "No config file, using embedded defaults");
            }
        }

        apply_env(&mut doc, env::vars());

        let config = Config {
            dir,
            file,
            doc: RwLock::new(doc),
        };
        config.save()?;
        Ok(config)
    }

    /// Directory holding `config.yaml`
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Writes the whole document to `config.yaml`
    pub fn save(&self) -> Result<()> {
        let text = {
            let doc = self.doc.read().map_err(|_| anyhow!("Configuration lock poisoned"))?;
            serde_yaml::to_string(&*doc)?
        };
        fs::write(&self.file, text)
            .with_context(|| format!("Cannot write {}", self.file.display()))
    }

    /// Stores `value` at `path` (e.g. `&["watcher", "poll_interval_ms"]`)
    /// and saves the file. Missing intermediate sections are created.
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut doc = self
                .doc
                .write()
                .map_err(|_| anyhow!("Configuration lock poisoned"))?;
            insert(&mut doc, path, value)?;
        }
        self.save()
    }

    /// Value stored at `path`, an error when a section or key is missing
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let doc = self.doc.read().map_err(|_| anyhow!("Configuration lock poisoned"))?;
        lookup(&doc, path).cloned()
    }

    /// Gets a non-empty string value, falling back to an environment variable
    ///
    /// Used for credentials, which are commonly provided through the
    /// conventional variables (`OPENAI_API_KEY`, ...) rather than the YAML file.
    pub fn get_string_or_env(&self, path: &[&str], env_var: &str) -> Option<String> {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => env::var(env_var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        }
    }

    /// Gets a non-empty string value or the provided default
    pub fn get_string_or(&self, path: &[&str], default: &str) -> String {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => default.to_string(),
        }
    }

    u64_setting!(
        get_http_timeout_secs,
        set_http_timeout_secs,
        &["host", "http_timeout_secs"],
        DEFAULT_HTTP_TIMEOUT_SECS
    );

    bool_setting!(
        get_log_ansi,
        set_log_ansi,
        &["host", "logger", "ansi"],
        DEFAULT_LOG_ANSI
    );

    /// Minimum log level (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`)
    pub fn get_log_min_level(&self) -> Result<String> {
        Ok(match self.get_value(&["host", "logger", "min_level"]) {
            Ok(Value::String(level)) => level,
            _ => DEFAULT_LOG_MIN_LEVEL.to_string(),
        })
    }

    pub fn set_log_min_level(&self, level: &str) -> Result<()> {
        self.set_value(
            &["host", "logger", "min_level"],
            Value::String(level.to_string()),
        )
    }
}

/// Loads the process-wide configuration on first call and returns it
///
/// Later calls return the already loaded instance and ignore `directory`.
/// A broken configuration directory or an invalid YAML file is returned
/// to the caller, so the binary can abort startup with a readable message.
pub fn init_config(directory: &str) -> Result<Arc<Config>> {
    CONFIG
        .get_or_try_init(|| Config::load_config(directory).map(Arc::new))
        .cloned()
}

fn resolve_dir(directory: &str) -> PathBuf {
    if !directory.is_empty() {
        return PathBuf::from(directory);
    }
    if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
        debug!(env_var = ENV_CONFIG_DIR, path = %from_env, "Config directory from env");
        return PathBuf::from(from_env);
    }

    let local = PathBuf::from(CONFIG_DIR_NAME);
    let home = dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME));

    std::iter::once(local.clone())
        .chain(home)
        .find(|candidate| candidate.is_dir())
        .unwrap_or(local)
}

fn ensure_usable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    // Écriture de test: le fichier fusionné y sera sauvegardé
    let probe = dir.join(".spotistats_probe");
    fs::write(&probe, b"")?;
    fs::remove_file(&probe)?;
    Ok(())
}

fn key(name: &str) -> Value {
    Value::String(name.to_lowercase())
}

/// Walks `path` down nested mappings
fn lookup<'a>(doc: &'a Value, path: &[&str]) -> Result<&'a Value> {
    path.iter()
        .enumerate()
        .try_fold(doc, |node, (depth, name)| match node {
            Value::Mapping(section) => section
                .get(key(name))
                .ok_or_else(|| anyhow!("No setting at {}", path[..=depth].join("."))),
            _ => Err(anyhow!("{} is not a section", path[..depth].join("."))),
        })
}

fn insert(doc: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };

    let mut node = doc;
    for name in parents {
        let Value::Mapping(section) = node else {
            bail!("Cannot create {}: parent is not a section", path.join("."));
        };
        node = section
            .entry(key(name))
            .or_insert(Value::Mapping(Mapping::new()));
    }

    match node {
        Value::Mapping(section) => {
            section.insert(key(last), value);
            Ok(())
        }
        _ => bail!("Cannot create {}: parent is not a section", path.join(".")),
    }
}

/// `SPOTISTATS_CONFIG__A__B=v` sets `a.b`; values are parsed as YAML scalars
fn apply_env<I>(doc: &mut Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, raw) in vars {
        let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<&str> = rest.split("__").collect();
        let value = serde_yaml::from_str::<Value>(&raw).unwrap_or_else(|_| Value::String(raw.clone()));
        if let Err(e) = insert(doc, &path, value) {
            debug!("Ignoring {}: {}", name, e);
        }
    }
}

fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Mapping(section) => Value::Mapping(
            section
                .into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, normalize_keys(v))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Deep merge: sections are merged key by key, anything else is replaced
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Mapping(base_section), Value::Mapping(top_section)) => {
            for (k, v) in top_section {
                match base_section.get_mut(&k) {
                    Some(existing) => overlay(existing, v),
                    None => {
                        base_section.insert(k, v);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
