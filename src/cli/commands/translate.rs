//! Translate command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::translation::{language_name, GoogleTranslator};
use anyhow::Result;
use std::sync::Arc;

/// Run the translate command.
pub async fn run_translate(text: &str, to: Option<&str>, settings: Settings) -> Result<()> {
    let target = to.unwrap_or(&settings.translation.default_target);
    if language_name(target).is_none() {
        Output::warning(&format!("'{}' is not one of the listed languages, trying anyway", target));
    }

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&settings.transcripts)?);
    let translator = GoogleTranslator::new(transport, &settings.translation);

    let translation = translator.translate(text, target).await?;
    println!("{}", translation.translated_text);

    Ok(())
}
