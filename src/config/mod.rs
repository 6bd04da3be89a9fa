//! Configuration module for Tubescribe.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ProductionPrompts, Prompts};
pub use settings::{
    LlmSettings, PromptSettings, ServerSettings, Settings, TranscriptSettings,
    TranslationSettings, YoutubeSettings,
};
