//! Configuration types and loading for sportbot.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::error::Result;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the sportbot database.
    pub database: PathBuf,

    /// Text-generation service settings.
    pub generation: GenerationConfig,

    /// Gamification tuning.
    pub progression: ProgressionConfig,

    /// Dialog session settings.
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sportbot");

        Self {
            database: data_dir.join("sportbot.db"),
            generation: GenerationConfig::default(),
            progression: ProgressionConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.expand_paths();
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sportbot")
            .join("config.toml")
    }

    /// Save configuration to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Ensure config exists at the given path, creating defaults if missing.
    pub fn ensure_at(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            let mut config = Self::default();
            config.expand_paths();
            config.save_to_path(path)?;
            Ok(config)
        }
    }

    /// Expand a path, replacing ~ with home directory.
    pub fn expand_path(path: &str) -> PathBuf {
        let expanded = shellexpand::full(path)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| path.to_string());
        PathBuf::from(expanded)
    }

    fn expand_paths(&mut self) {
        self.database = Self::expand_path(&self.database.to_string_lossy());
    }
}

/// Settings for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Chat-completions endpoint URL.
    pub api_url: String,

    /// API key; the SPORTBOT_API_KEY environment variable wins over the
    /// config file so the key can stay out of it.
    pub api_key: String,

    /// Model identifier.
    pub model: String,

    pub temperature: f32,
    pub max_tokens: u32,

    /// Request timeout. Generation is best-effort: on timeout the caller
    /// receives the fixed fallback string.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.mistral.ai/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "mistral-small".to_string(),
            temperature: 0.4,
            max_tokens: 4096,
            timeout_secs: 10,
        }
    }
}

impl GenerationConfig {
    /// Resolved API key: environment variable first, then config file.
    pub fn api_key(&self) -> String {
        std::env::var("SPORTBOT_API_KEY").unwrap_or_else(|_| self.api_key.clone())
    }
}

/// Gamification tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience awarded per recorded visit.
    pub xp_per_visit: i64,

    /// Experience required to leave level L is `L * level_up_factor`.
    pub level_up_factor: i64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_visit: crate::progression::XP_PER_VISIT,
            level_up_factor: crate::progression::LEVEL_UP_XP_FACTOR,
        }
    }
}

/// Dialog session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle sessions are evicted after this many seconds.
    pub idle_ttl_secs: u64,

    /// Free-text messages shorter than this never reach the generation
    /// service (cost/noise control).
    pub min_query_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 900,
            min_query_chars: 5,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
