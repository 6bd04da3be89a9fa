//! Prompt templates for Tubescribe.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use super::Settings;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub production: ProductionPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompt for generating localized production metadata (title, description, tags).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionPrompts {
    pub user: String,
}

impl Default for ProductionPrompts {
    fn default() -> Self {
        Self {
            user: r#"Generate YouTube production content in Spanish for this football video.

ORIGINAL TITLE: {{title}}

ENGLISH CONTENT: {{english_text}}

Return EXACTLY this JSON format (no markdown, no code blocks, just raw JSON):
{
    "title": "🚨 SPANISH TITLE IN ALL CAPS HERE",
    "description": "Long SEO description here with emojis and hashtags at end",
    "tags": "tag1, tag2, tag3, tag4, tag5"
}

RULES FOR EACH FIELD:
- TITLE: Translate to Spanish, add 🚨 at start, ALL UPPERCASE letters
- DESCRIPTION: 5-8 sentences, SEO-optimized, include emojis, hashtags at end (lowercase like #futbol #barcelona), NO bold/markdown formatting
- TAGS: 10-15 tags separated by commas, all lowercase, include player names, team names, relevant topics

Return ONLY the JSON, nothing else."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let production_path = Settings::expand_path(dir).join("production.toml");
            if production_path.exists() {
                let content = std::fs::read_to_string(&production_path)?;
                prompts.production = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are substituted in one pass over the template, so values
    /// are never rescanned. Unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER_RE
            .get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder regex"));

        re.replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
