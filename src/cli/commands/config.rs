//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&redacted(settings))
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                Output::warning(&format!("Config already exists at {}", config_path.display()));
                Output::info("Use --force to overwrite it.");
                return Ok(());
            }

            settings.save_to(&config_path)?;
            Output::success(&format!("Wrote config to {}", config_path.display()));
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Settings with API keys masked for display.
fn redacted(mut settings: Settings) -> Settings {
    let mask = |key: &mut Option<String>| {
        if key.is_some() {
            *key = Some("********".to_string());
        }
    };
    mask(&mut settings.youtube.api_key);
    mask(&mut settings.llm.gemini_api_key);
    mask(&mut settings.llm.groq_api_key);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_masks_keys() {
        let mut settings = Settings::default();
        settings.youtube.api_key = Some("secret".to_string());

        let shown = redacted(settings);
        assert_eq!(shown.youtube.api_key.as_deref(), Some("********"));
        assert!(shown.llm.groq_api_key.is_none());
    }

    #[test]
    fn test_init_writes_and_respects_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run_config(&ConfigAction::Init { force: false }, Some(path.clone()), Settings::default()).unwrap();
        let written = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(written.server.port, 5000);

        let mut changed = Settings::default();
        changed.server.port = 9000;
        run_config(&ConfigAction::Init { force: false }, Some(path.clone()), changed.clone()).unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("9000"));

        run_config(&ConfigAction::Init { force: true }, Some(path.clone()), changed).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("9000"));
    }
}
