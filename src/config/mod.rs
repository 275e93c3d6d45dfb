//! Configuration loading and management
//!
//! Settings come from `~/.lumen/config.toml` (or a `--config` path). Every
//! section and field is optional; a missing file means all defaults.

mod io;

pub use io::write_locked;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::assistant::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::domain::DEFAULT_TASK_XP;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    /// Companion (language model) settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `lumen.db`; defaults to `~/.lumen`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    pub api_key_env: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl AssistantConfig {
    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// XP for new tasks when none is given
    pub default_task_xp: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_task_xp: DEFAULT_TASK_XP,
        }
    }
}

impl Config {
    /// Data directory, falling back to the global config dir
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::global_config_dir)
    }

    /// Dotted keys accepted by [`Config::set`]
    pub const KEYS: &[&str] = &[
        "storage.data_dir",
        "assistant.api_key_env",
        "assistant.model",
        "assistant.base_url",
        "assistant.timeout_secs",
        "app.default_task_xp",
    ];

    /// Set one value by its dotted key, e.g. `app.default_task_xp`.
    /// An empty `storage.data_dir` clears it back to the default.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "storage.data_dir" => {
                self.storage.data_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "assistant.api_key_env" => self.assistant.api_key_env = non_empty(key, value)?,
            "assistant.model" => self.assistant.model = non_empty(key, value)?,
            "assistant.base_url" => {
                self.assistant.base_url = non_empty(key, value)?.trim_end_matches('/').to_string()
            }
            "assistant.timeout_secs" => {
                self.assistant.timeout_secs = value
                    .parse()
                    .with_context(|| format!("{key} expects whole seconds, got '{value}'"))?;
            }
            "app.default_task_xp" => {
                self.app.default_task_xp = value
                    .parse()
                    .with_context(|| format!("{key} expects a whole number, got '{value}'"))?;
            }
            _ => bail!("Unknown config key '{key}' (known: {})", Self::KEYS.join(", ")),
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        bail!("{key} cannot be empty");
    }
    Ok(value.to_string())
}
