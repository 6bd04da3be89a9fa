//! Models command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::translation::{ModelCatalog, Provider};
use anyhow::Result;

/// Run the models command.
pub fn run_models(settings: Settings) -> Result<()> {
    let catalog = ModelCatalog::new(settings.llm.models.clone(), &settings.llm.default_model)?;

    Output::header("Production Models");
    println!();

    for model in catalog.models() {
        let marker = if model.id == catalog.default_model() {
            " (default)"
        } else {
            ""
        };
        Output::list_item(&format!(
            "{} [{}] {}{}: {}",
            model.name, model.provider, model.id, marker, model.description
        ));
    }

    println!();
    let key_status = |configured: bool| if configured { "configured" } else { "missing" };
    Output::kv("Google key", key_status(settings.llm.gemini_api_key.is_some()));
    Output::kv("Groq key", key_status(settings.llm.groq_api_key.is_some()));

    let default = catalog.resolve(None)?;
    let default_usable = match default.provider {
        Provider::Google => settings.llm.gemini_api_key.is_some(),
        Provider::Groq => settings.llm.groq_api_key.is_some(),
    };
    if !default_usable {
        Output::warning(&format!("No API key for the default model's provider ({})", default.provider));
    }

    Ok(())
}
