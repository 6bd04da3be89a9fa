//! Machine translation through the public Google Translate endpoint.

use crate::config::TranslationSettings;
use crate::error::{Result, ScribeError};
use crate::http::HttpTransport;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Outcome of a translation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub translated_text: String,
    pub target_lang: String,
}

/// Translates text with automatic source language detection.
pub struct GoogleTranslator {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &TranslationSettings) -> Self {
        Self {
            transport,
            endpoint: settings.endpoint.clone(),
        }
    }

    /// Translate `text` into `target_lang`.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<Translation> {
        if text.trim().is_empty() {
            return Err(ScribeError::InvalidInput("no text to translate".to_string()));
        }

        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ScribeError::Config(format!("Invalid translation endpoint: {}", e)))?;

        let response = self
            .transport
            .get_json(url.as_str())
            .await
            .map_err(|e| ScribeError::Translation(e.to_string()))?;

        let translated_text = parse_translation(&response)?;
        debug!("Translated into {}", target_lang);

        Ok(Translation {
            translated_text,
            target_lang: target_lang.to_string(),
        })
    }
}

/// Concatenate the translated sentences of a `translate_a/single` response.
///
/// The response is a nested array whose first element lists
/// `[translated, original, ...]` per sentence.
fn parse_translation(response: &serde_json::Value) -> Result<String> {
    let sentences = response
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| ScribeError::Translation("unexpected response format".to_string()))?;

    Ok(sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(|t| t.as_str()))
        .collect())
}
