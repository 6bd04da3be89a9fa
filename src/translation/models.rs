//! Selectable LLM models for production content generation.

use crate::error::{Result, ScribeError};
use serde::{Deserialize, Serialize};

/// Backend serving a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Gemini and Gemma through the Google AI API.
    Google,
    /// OpenAI-compatible chat through Groq.
    Groq,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Google => write!(f, "google"),
            Provider::Groq => write!(f, "groq"),
        }
    }
}

/// A model offered to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier passed to the provider API.
    pub id: String,
    /// Display name.
    pub name: String,
    pub description: String,
    /// Model family, used for grouping in the UI.
    pub category: String,
    pub provider: Provider,
}

impl ModelInfo {
    fn new(id: &str, name: &str, description: &str, category: &str, provider: Provider) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            provider,
        }
    }
}

/// The built-in model list.
pub fn default_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new(
            "gemini-2.5-flash-lite",
            "Gemini 2.5 Flash Lite",
            "Fast, best quality (default)",
            "gemini",
            Provider::Google,
        ),
        ModelInfo::new(
            "gemma-3-27b-it",
            "Gemma 3 27B",
            "Powerful open-source backup",
            "gemma",
            Provider::Google,
        ),
        ModelInfo::new(
            "gemma-3-4b-it",
            "Gemma 3 4B",
            "Fast open-source backup",
            "gemma",
            Provider::Google,
        ),
        ModelInfo::new(
            "openai/gpt-oss-120b",
            "GPT-OSS 120B (Groq)",
            "ChatGPT-style via Groq",
            "groq",
            Provider::Groq,
        ),
    ]
}

/// Lookup over the configured models with a default.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
    default_model: String,
}

impl ModelCatalog {
    /// Build a catalog. The default must name one of the models.
    pub fn new(models: Vec<ModelInfo>, default_model: &str) -> Result<Self> {
        if !models.iter().any(|m| m.id == default_model) {
            return Err(ScribeError::Config(format!(
                "default model '{}' is not in the model list",
                default_model
            )));
        }
        Ok(Self {
            models,
            default_model: default_model.to_string(),
        })
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn get(&self, id: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.id == id)
    }

    /// The requested model, or the default when none is named.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&ModelInfo> {
        let id = requested
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_model.as_str());
        self.get(id)
            .ok_or_else(|| ScribeError::UnknownModel(id.to_string()))
    }
}
