use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::lesson::{BreakdownStyle, Languages};
use crate::core::voice::types::{VoiceConfig, VoiceProviderType};

/// Environment variable prefix for overrides (`WORD_TUTOR_LLM__MODEL=...`).
pub const ENV_PREFIX: &str = "WORD_TUTOR_";
/// Explicit config file location override.
pub const CONFIG_PATH_VAR: &str = "WORD_TUTOR_CONFIG";
/// Plain Gemini key variable, honored when no prefixed key is set.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Missing required credential: {0}")]
    MissingCredential(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub languages: Languages,
    pub llm: LlmConfig,
    pub voice: VoiceConfig,
    pub lesson: LessonConfig,
    pub logging: LoggingConfig,
}

/// Generative backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Sampling temperature; kept near zero for reproducible output.
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Knobs for prompt content and rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    pub synonym_count: String,
    pub antonym_count: String,
    pub example_count: u32,
    pub collocation_count: String,
    /// Platform cap for attachment captions, in characters.
    pub caption_limit: usize,
    pub breakdown_style: BreakdownStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Override the JSON log directory.
    pub log_dir: Option<PathBuf>,
    pub file_logging: bool,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            languages: Languages::default(),
            llm: LlmConfig::default(),
            voice: VoiceConfig::default(),
            lesson: LessonConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.1,
            timeout_secs: 60,
        }
    }
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            synonym_count: "3-5".to_string(),
            antonym_count: "2-3".to_string(),
            example_count: 5,
            collocation_count: "3-5".to_string(),
            caption_limit: 1024,
            breakdown_style: BreakdownStyle::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            file_logging: true,
            default_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Layered sources: defaults, then the TOML file, then `WORD_TUTOR_*` env vars.
    pub fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config: AppConfig = Self::figment(&config_path).extract()?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var(GEMINI_KEY_VAR).ok();
        }

        log::debug!("Configuration resolved (file: {})", config_path.display());
        Ok(config)
    }

    /// Check that every credential the configured backends need is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_key = self
            .llm
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !has_key {
            return Err(ConfigError::MissingCredential(GEMINI_KEY_VAR.to_string()));
        }

        if self.voice.provider == VoiceProviderType::ElevenLabs && self.voice.elevenlabs.is_none() {
            return Err(ConfigError::MissingCredential(
                "voice.elevenlabs.api_key".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolved log directory (override or XDG default).
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .log_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("word-tutor").join("logs")))
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("word-tutor").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
