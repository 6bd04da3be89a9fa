//! LLM providers used for production content generation.

use crate::config::LlmSettings;
use crate::error::{Result, ScribeError};
use crate::http::HttpTransport;
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default timeout for LLM requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Sampling parameters shared by all providers.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&LlmSettings> for GenerationOptions {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// A text completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a single user prompt and return the reply text.
    async fn complete(&self, model: &str, prompt: &str, options: GenerationOptions)
        -> Result<String>;
}

/// Gemini/Gemma through the Google AI `generateContent` REST API.
pub struct GeminiProvider {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: &str, api_key: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    #[instrument(skip(self, prompt, options))]
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        let url = url::Url::parse_with_params(
            &format!("{}/models/{}:generateContent", self.base_url, model),
            &[("key", self.api_key.as_str())],
        )
        .map_err(|e| ScribeError::Config(format!("Invalid Gemini URL: {}", e)))?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_tokens,
            }
        });

        let response = self
            .transport
            .post_json(url.as_str(), &body)
            .await
            .map_err(|e| ScribeError::Llm(format!("Gemini request failed: {}", e)))?;

        let text: String = response["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ScribeError::Llm("Empty response from Gemini".to_string()));
        }

        debug!("Gemini returned {} characters", text.len());
        Ok(text)
    }
}

/// OpenAI-compatible chat completions served by Groq.
pub struct GroqProvider {
    client: Client<OpenAIConfig>,
}

impl GroqProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScribeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);

        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client),
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    #[instrument(skip(self, prompt, options))]
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| ScribeError::Llm(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![message.into()])
            .temperature(options.temperature)
            .max_completion_tokens(options.max_tokens)
            .build()
            .map_err(|e| ScribeError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ScribeError::Llm(format!("Groq request failed: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ScribeError::Llm("Empty response from Groq".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::MockTransport;
    use serde_json::json;

    fn options() -> GenerationOptions {
        GenerationOptions::from(&LlmSettings::default())
    }

    #[tokio::test]
    async fn test_gemini_joins_parts() {
        let transport = Arc::new(MockTransport::new().json(
            "models/gemma-3-4b-it:generateContent",
            json!({ "candidates": [{ "content": { "parts": [{ "text": "{\"title\":" }, { "text": "\"X\"}" }] } }] }),
        ));
        let provider = GeminiProvider::new(transport.clone(), "https://ai.test/v1beta/", "G_KEY");

        let text = provider.complete("gemma-3-4b-it", "prompt", options()).await.unwrap();
        assert_eq!(text, "{\"title\":\"X\"}");
        assert!(transport.requests()[0].starts_with("https://ai.test/v1beta/models/"));
        assert!(transport.requests()[0].ends_with("key=G_KEY"));
    }

    #[tokio::test]
    async fn test_gemini_empty_candidates() {
        let transport = Arc::new(MockTransport::new().json("generateContent", json!({ "candidates": [] })));
        let provider = GeminiProvider::new(transport, "https://ai.test", "k");

        let err = provider.complete("m", "p", options()).await.unwrap_err();
        assert!(matches!(err, ScribeError::Llm(_)));
    }

    #[test]
    fn test_groq_provider_creation() {
        assert!(GroqProvider::new("https://api.groq.com/openai/v1", "gsk_test").is_ok());
    }
}
