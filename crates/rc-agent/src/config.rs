//! Chatbot configuration, loadable from TOML or environment.

use std::path::Path;

use serde::Deserialize;

use crate::docs::DocsConfig;
use crate::error::ConfigError;
use crate::llm::GeminiConfig;
use crate::recon::ReconConfig;

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_RECON_URL: &str = "RECON_URL";
pub const ENV_RECON_API_SCHEMA: &str = "RECON_API_SCHEMA";
pub const ENV_RECON_API_GUIDE: &str = "RECON_API_GUIDE";

/// Top-level configuration for the chatbot agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatbotConfig {
    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Recon service settings.
    #[serde(default)]
    pub recon: ReconConfig,
    /// Where the API schema and guide live on disk.
    #[serde(default)]
    pub docs: DocsConfig,
}

impl ChatbotConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply environment overrides on top of the current values.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_GEMINI_API_KEY) {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get(ENV_GEMINI_MODEL) {
            self.gemini.model = model;
        }
        if let Some(url) = get(ENV_GEMINI_BASE_URL) {
            self.gemini.base_url = url;
        }
        if let Some(url) = get(ENV_RECON_URL) {
            self.recon.base_url = url;
        }
        if let Some(path) = get(ENV_RECON_API_SCHEMA) {
            self.docs.schema_path = path.into();
        }
        if let Some(path) = get(ENV_RECON_API_GUIDE) {
            self.docs.guide_path = path.into();
        }
    }

    /// The Gemini API key, if a non-blank one is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}
