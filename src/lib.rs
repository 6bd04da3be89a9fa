//! Tubescribe - YouTube transcript extraction and localization
//!
//! A CLI and HTTP backend for pulling caption transcripts from YouTube videos,
//! browsing a channel's uploads and preparing localized production metadata.
//!
//! # Overview
//!
//! Tubescribe allows you to:
//! - Extract plain-text transcripts for one or many videos
//! - List and search the uploads of a configured channel
//! - Translate transcripts into a set of target languages
//! - Generate localized titles, descriptions and tags with an LLM
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `http` - HTTP transport abstraction with retries
//! - `transcript` - Caption track resolution and transcript fetching
//! - `orchestrator` - Single and batch transcript extraction
//! - `youtube` - YouTube Data API channel client
//! - `translation` - Machine translation and production content generation
//!
//! # Example
//!
//! ```rust,no_run
//! use tubescribe::config::Settings;
//! use tubescribe::orchestrator::TranscriptExtractor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let extractor = TranscriptExtractor::new(&settings.transcripts)?;
//!
//!     let result = extractor.extract("dQw4w9WgXcQ").await;
//!     if result.success {
//!         println!("{}", result.transcript);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod transcript;
pub mod translation;
pub mod youtube;

pub use error::{Result, ScribeError};
