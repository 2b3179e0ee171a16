//! Extension pour intégrer OpenAI dans stsconfig

use crate::client::{OpenAiClient, DEFAULT_API_BASE, DEFAULT_MODEL};
use anyhow::{anyhow, Result};
use serde_yaml::Value;
use stsconfig::Config;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Trait d'extension pour la configuration OpenAI
///
/// # Exemple
///
/// ```no_run
/// use stsopenai::OpenAiConfigExt;
///
/// # fn main() -> anyhow::Result<()> {
/// let config = stsconfig::init_config("")?;
/// println!("model: {}", config.get_openai_model()?);
/// # Ok(())
/// # }
/// ```
pub trait OpenAiConfigExt {
    fn get_openai_api_base(&self) -> Result<String>;

    /// Clé d'API (config ou `OPENAI_API_KEY`)
    fn get_openai_api_key(&self) -> Option<String>;
    fn set_openai_api_key(&self, key: &str) -> Result<()>;

    /// Modèle de chat (défaut : `gpt-4o-mini`)
    fn get_openai_model(&self) -> Result<String>;
    fn set_openai_model(&self, model: &str) -> Result<()>;
}

impl OpenAiConfigExt for Config {
    fn get_openai_api_base(&self) -> Result<String> {
        Ok(self.get_string_or(&["sources", "openai", "api_base"], DEFAULT_API_BASE))
    }

    fn get_openai_api_key(&self) -> Option<String> {
        self.get_string_or_env(&["sources", "openai", "api_key"], API_KEY_ENV)
    }

    fn set_openai_api_key(&self, key: &str) -> Result<()> {
        self.set_value(
            &["sources", "openai", "api_key"],
            Value::String(key.to_string()),
        )
    }

    fn get_openai_model(&self) -> Result<String> {
        match self.get_value(&["sources", "openai", "model"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_openai_model(DEFAULT_MODEL)?;
                Ok(DEFAULT_MODEL.to_string())
            }
        }
    }

    fn set_openai_model(&self, model: &str) -> Result<()> {
        self.set_value(
            &["sources", "openai", "model"],
            Value::String(model.to_string()),
        )
    }
}

impl OpenAiClient {
    /// Builds a client from the `sources.openai` section
    ///
    /// # Errors
    ///
    /// Fails when no API key is available.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_openai_api_key().ok_or_else(|| {
            anyhow!(
                "No OpenAI API key: set sources.openai.api_key or {}",
                API_KEY_ENV
            )
        })?;

        Ok(OpenAiClient::builder()
            .api_base(config.get_openai_api_base()?)
            .api_key(api_key)
            .model(config.get_openai_model()?)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_model_override() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "sources:\n  openai:\n    api_key: sk-test\n    model: gpt-4o\n",
        )
        .unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.get_openai_model().unwrap(), "gpt-4o");
        assert_eq!(config.get_openai_api_base().unwrap(), DEFAULT_API_BASE);

        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "gpt-4o");
    }
}
