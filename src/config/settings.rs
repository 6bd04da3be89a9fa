//! Configuration settings for Tubescribe.

use crate::translation::{default_models, ModelInfo};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub youtube: YoutubeSettings,
    pub transcripts: TranscriptSettings,
    pub translation: TranslationSettings,
    pub llm: LlmSettings,
    pub prompts: PromptSettings,
}

/// HTTP API server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors: true,
        }
    }
}

/// YouTube Data API and channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key (also read from YOUTUBE_API_KEY).
    pub api_key: Option<String>,
    /// Base URL of the Data API.
    pub api_base_url: String,
    /// Handle of the channel being browsed.
    pub channel_handle: String,
    /// Limit listings to a small page and disable pagination.
    pub dev_mode: bool,
    /// Page size used in dev mode.
    pub dev_video_limit: u32,
    /// Page size used otherwise (the Data API caps this at 50).
    pub page_size: u32,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            channel_handle: "@RafTalks".to_string(),
            dev_mode: true,
            dev_video_limit: 20,
            page_size: 50,
        }
    }
}

impl YoutubeSettings {
    /// Effective page size for listing and search.
    pub fn max_results(&self) -> u32 {
        if self.dev_mode {
            self.dev_video_limit
        } else {
            self.page_size
        }
    }
}

/// Transcript extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Host serving the watch page and the InnerTube API.
    pub base_url: String,
    /// Pinned InnerTube WEB client version.
    pub client_version: String,
    /// Desktop browser user agent sent with every request.
    pub user_agent: String,
    /// Timeout applied to each outbound request.
    pub request_timeout_secs: u64,
    /// Maximum videos extracted concurrently in a batch (1 = serial).
    pub max_concurrent: usize,
    /// Retries for transient fetch failures.
    pub max_retries: u32,
    /// Initial backoff between retries, doubled on each attempt.
    pub retry_backoff_ms: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            client_version: "2.20251031.00.00".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout_secs: 20,
            max_concurrent: 3,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

/// Machine translation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Google Translate endpoint.
    pub endpoint: String,
    /// Target language used when a request names none.
    pub default_target: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            default_target: "es".to_string(),
        }
    }
}

/// LLM provider settings for production metadata generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model used when a request does not name one.
    pub default_model: String,
    /// Google AI key (also read from GEMINI_API_KEY, falling back to the YouTube key).
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// Groq key (also read from GROQ_API_KEY).
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Characters of source text included in the prompt.
    pub content_char_limit: usize,
    /// Selectable models.
    pub models: Vec<ModelInfo>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            default_model: "gemini-2.5-flash-lite".to_string(),
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            groq_api_key: None,
            groq_base_url: "https://api.groq.com/openai/v1".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            content_char_limit: 1000,
            models: default_models(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment variables override keys from the file.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply API keys from the environment.
    ///
    /// Takes a lookup function so tests don't have to touch the process env.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = non_empty("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }
        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.llm.gemini_api_key = Some(key);
        }
        if let Some(key) = non_empty("GROQ_API_KEY") {
            self.llm.groq_api_key = Some(key);
        }

        if self.llm.gemini_api_key.is_none() {
            self.llm.gemini_api_key = self.youtube.api_key.clone();
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ScribeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubescribe")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
