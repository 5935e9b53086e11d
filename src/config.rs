use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::DEFAULT_AI_TIMEOUT_SECS;
use crate::triage::TieBreak;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// AI features configuration (OpenRouter-compatible API)
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// AI features configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key; the environment and the OS keyring take precedence
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model to use (default: anthropic/claude-3-haiku)
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Per-request timeout; expiry is treated like any other failure
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,
    #[serde(default = "default_priority_max_tokens")]
    pub priority_max_tokens: u32,
    #[serde(default = "default_articles_max_tokens")]
    pub articles_max_tokens: u32,
    #[serde(default = "default_response_max_tokens")]
    pub response_max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_ai_model(),
            timeout_secs: default_timeout_secs(),
            summary_max_tokens: default_summary_max_tokens(),
            priority_max_tokens: default_priority_max_tokens(),
            articles_max_tokens: default_articles_max_tokens(),
            response_max_tokens: default_response_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    /// Order of inquiries with equal priority score
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
    /// Name shown for agent messages
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    #[serde(default)]
    pub agent_avatar: Option<String>,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            preview_length: default_preview_length(),
            agent_name: default_agent_name(),
            agent_avatar: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Override for the key-value store database file
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_ai_model() -> String {
    "anthropic/claude-3-haiku".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_AI_TIMEOUT_SECS
}

fn default_summary_max_tokens() -> u32 {
    300
}

fn default_priority_max_tokens() -> u32 {
    300
}

fn default_articles_max_tokens() -> u32 {
    300
}

fn default_response_max_tokens() -> u32 {
    1200
}

fn default_preview_length() -> usize {
    80
}

fn default_agent_name() -> String {
    "Agent".to_string()
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("supportpal");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::data_local_dir()
            .context("Could not find data directory")?
            .join("supportpal");
        Ok(dir)
    }

    /// Path of the SQLite key-value store
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("store.db")),
        }
    }

    /// Load the config file, or defaults when it does not exist yet
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        let store_path = self.store_path()?;
        if let Some(parent) = store_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
