//! Localized production metadata (title, description, tags) from an LLM.

use super::llm::{GeminiProvider, GenerationOptions, GroqProvider, LlmProvider};
use super::models::{ModelCatalog, Provider};
use crate::config::{LlmSettings, Prompts};
use crate::error::{Result, ScribeError};
use crate::http::HttpTransport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Generated production content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionContent {
    pub title: String,
    pub description: String,
    pub tags: String,
}

/// Renders the production prompt and sends it to the provider of the chosen model.
pub struct ProductionGenerator {
    catalog: ModelCatalog,
    prompts: Prompts,
    options: GenerationOptions,
    content_char_limit: usize,
    google: Option<Arc<dyn LlmProvider>>,
    groq: Option<Arc<dyn LlmProvider>>,
}

impl ProductionGenerator {
    /// Build a generator with providers for every configured API key.
    pub fn new(
        settings: &LlmSettings,
        prompts: Prompts,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let google = settings
            .gemini_api_key
            .as_deref()
            .map(|key| {
                Arc::new(GeminiProvider::new(transport, &settings.gemini_base_url, key))
                    as Arc<dyn LlmProvider>
            });

        let groq = match settings.groq_api_key.as_deref() {
            Some(key) => Some(Arc::new(GroqProvider::new(&settings.groq_base_url, key)?)
                as Arc<dyn LlmProvider>),
            None => None,
        };

        Self::with_providers(settings, prompts, google, groq)
    }

    /// Build a generator over explicit providers.
    pub fn with_providers(
        settings: &LlmSettings,
        prompts: Prompts,
        google: Option<Arc<dyn LlmProvider>>,
        groq: Option<Arc<dyn LlmProvider>>,
    ) -> Result<Self> {
        Ok(Self {
            catalog: ModelCatalog::new(settings.models.clone(), &settings.default_model)?,
            prompts,
            options: GenerationOptions::from(settings),
            content_char_limit: settings.content_char_limit,
            google,
            groq,
        })
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Generate production content with `model`, or the default model when `None`.
    ///
    /// Returns the content and the ID of the model that produced it.
    #[instrument(skip(self, english_text))]
    pub async fn generate(
        &self,
        title: &str,
        english_text: &str,
        model: Option<&str>,
    ) -> Result<(ProductionContent, String)> {
        if english_text.trim().is_empty() {
            return Err(ScribeError::InvalidInput("no English text provided".to_string()));
        }

        let model = self.catalog.resolve(model)?;
        let provider = match model.provider {
            Provider::Google => self.google.as_ref().ok_or_else(|| {
                ScribeError::Config("Gemini API key not configured".to_string())
            })?,
            Provider::Groq => self.groq.as_ref().ok_or_else(|| {
                ScribeError::Config("Groq API key not configured".to_string())
            })?,
        };

        let mut vars = HashMap::new();
        vars.insert("title".to_string(), title.to_string());
        vars.insert(
            "english_text".to_string(),
            truncate_chars(english_text, self.content_char_limit).to_string(),
        );
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.production.user, &vars);

        info!("Generating production content with {} ({})", model.id, model.provider);
        let reply = provider.complete(&model.id, &prompt, self.options).await?;

        Ok((parse_production_reply(&reply)?, model.id.clone()))
    }
}

/// The first `limit` characters of `text`.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse a model reply, tolerating a surrounding Markdown code fence.
pub fn parse_production_reply(reply: &str) -> Result<ProductionContent> {
    let mut body = reply.trim();

    if body.starts_with("```") {
        body = body.split("```").nth(1).unwrap_or_default();
        body = body.strip_prefix("json").unwrap_or(body);
    }

    serde_json::from_str(body.trim())
        .map_err(|e| ScribeError::Llm(format!("Failed to parse AI response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with a canned reply.
    struct CannedProvider {
        reply: String,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl CannedProvider {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(
            &self,
            model: &str,
            prompt: &str,
            _options: GenerationOptions,
        ) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            Ok(self.reply.clone())
        }
    }

    const REPLY: &str = r#"{"title":"🚨 GOLAZO","description":"Descripción #futbol","tags":"futbol, gol"}"#;

    #[test]
    fn test_parse_plain_reply() {
        let content = parse_production_reply(REPLY).unwrap();
        assert_eq!(content.title, "🚨 GOLAZO");
        assert_eq!(content.tags, "futbol, gol");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{}\n```", REPLY);
        assert_eq!(parse_production_reply(&fenced).unwrap().title, "🚨 GOLAZO");

        let bare_fence = format!("  ```\n{}\n```  ", REPLY);
        assert_eq!(parse_production_reply(&bare_fence).unwrap().description, "Descripción #futbol");
    }

    #[test]
    fn test_parse_missing_fields_default() {
        let content = parse_production_reply(r#"{"title":"T"}"#).unwrap();
        assert_eq!(content.title, "T");
        assert!(content.tags.is_empty());
    }

    #[test]
    fn test_parse_invalid_reply() {
        let err = parse_production_reply("Sure! Here is your content").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse AI response"));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("añb", 2), "añ");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[tokio::test]
    async fn test_generate_dispatches_by_provider() {
        let google = CannedProvider::new(REPLY);
        let groq = CannedProvider::new(&format!("```json{}```", REPLY));
        let generator = ProductionGenerator::with_providers(
            &LlmSettings::default(),
            Prompts::default(),
            Some(google.clone()),
            Some(groq.clone()),
        )
        .unwrap();

        let (_, used) = generator.generate("Title", "Some text", None).await.unwrap();
        assert_eq!(used, "gemini-2.5-flash-lite");
        assert_eq!(google.prompts.lock().unwrap().len(), 1);

        let (content, used) = generator
            .generate("Title", "Some text", Some("openai/gpt-oss-120b"))
            .await
            .unwrap();
        assert_eq!(used, "openai/gpt-oss-120b");
        assert_eq!(content.title, "🚨 GOLAZO");
        assert_eq!(groq.prompts.lock().unwrap()[0].0, "openai/gpt-oss-120b");
    }

    #[tokio::test]
    async fn test_generate_renders_truncated_prompt() {
        let google = CannedProvider::new(REPLY);
        let settings = LlmSettings {
            content_char_limit: 5,
            ..LlmSettings::default()
        };
        let generator =
            ProductionGenerator::with_providers(&settings, Prompts::default(), Some(google.clone()), None)
                .unwrap();

        generator.generate("El Clásico", "0123456789", None).await.unwrap();

        let prompts = google.prompts.lock().unwrap();
        let prompt = &prompts[0].1;
        assert!(prompt.contains("ORIGINAL TITLE: El Clásico"));
        assert!(prompt.contains("ENGLISH CONTENT: 01234\n"));
        assert!(!prompt.contains("{{"));
    }

    #[tokio::test]
    async fn test_generate_missing_provider_key() {
        let generator = ProductionGenerator::with_providers(
            &LlmSettings::default(),
            Prompts::default(),
            Some(CannedProvider::new(REPLY)),
            None,
        )
        .unwrap();

        let err = generator
            .generate("T", "text", Some("openai/gpt-oss-120b"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Groq API key not configured");
    }

    #[tokio::test]
    async fn test_generate_rejects_unknown_model_and_empty_text() {
        let generator = ProductionGenerator::with_providers(
            &LlmSettings::default(),
            Prompts::default(),
            Some(CannedProvider::new(REPLY)),
            None,
        )
        .unwrap();

        assert!(matches!(
            generator.generate("T", "text", Some("nope")).await,
            Err(ScribeError::UnknownModel(_))
        ));
        assert!(matches!(
            generator.generate("T", "  ", None).await,
            Err(ScribeError::InvalidInput(_))
        ));
    }
}
