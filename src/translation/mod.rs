//! Translation and localized production content.

mod google;
mod llm;
mod models;
mod production;

pub use google::{GoogleTranslator, Translation};
pub use llm::{GeminiProvider, GenerationOptions, GroqProvider, LlmProvider};
pub use models::{default_models, ModelCatalog, ModelInfo, Provider};
pub use production::{parse_production_reply, ProductionContent, ProductionGenerator};

/// Supported translation targets as `(code, English name)`.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("es", "Spanish"),
    ("pt", "Portuguese"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("zh-CN", "Chinese (Simplified)"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
];

/// English name of a supported language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("zh-CN"), Some("Chinese (Simplified)"));
        assert_eq!(language_name("xx"), None);
        assert_eq!(LANGUAGES.len(), 10);
    }
}
