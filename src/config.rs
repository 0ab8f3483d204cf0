//! Configuration loading and persistence
//!
//! Config lives at `~/.config/stackroast/config.toml`. Provider API keys can
//! also come from `GEMINI_API_KEY` / `OPENAI_API_KEY`, which take precedence
//! over the file so keys never have to be written to disk.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Default model for the primary (Gemini) provider
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default model for the secondary (OpenAI-compatible) provider
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default base URL for the OpenAI-compatible provider
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// AI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub gemini_model: String,
    pub openai_model: String,
    /// Request deadline in seconds; absent means the HTTP client default
    pub timeout_secs: Option<u64>,
    /// Stream roasts token-by-token when the primary provider supports it
    pub streaming: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_secs: Some(60),
            streaming: true,
        }
    }
}

impl AiConfig {
    /// Resolved Gemini key: environment wins over the config file
    pub fn gemini_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.gemini_api_key.clone())
    }

    /// Resolved OpenAI key: environment wins over the config file
    pub fn openai_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.openai_api_key.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackRoastConfig {
    pub ai: AiConfig,
}

impl StackRoastConfig {
    /// Path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "stackroast")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Path to the catalog database
    pub fn db_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "stackroast")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().join("catalog.db"))
    }

    /// Load config from disk, falling back to defaults when missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to disk, creating parent directories as needed
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StackRoastConfig::default();
        assert_eq!(config.ai.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.ai.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.ai.streaming);
        assert_eq!(config.ai.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = StackRoastConfig::default();
        config.ai.gemini_api_key = Some("test-key".into());
        config.ai.timeout_secs = Some(30);

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: StackRoastConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.ai.gemini_api_key.as_deref(), Some("test-key"));
        assert_eq!(parsed.ai.timeout_secs, Some(30));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: StackRoastConfig = toml::from_str("[ai]\nstreaming = false\n").unwrap();
        assert!(!parsed.ai.streaming);
        assert_eq!(parsed.ai.openai_model, DEFAULT_OPENAI_MODEL);
    }
}
