//! CLI command implementations.

mod config;
mod models;
mod serve;
mod transcript;
mod translate;
mod videos;

pub use config::run_config;
pub use models::run_models;
pub use serve::run_serve;
pub use transcript::run_transcript;
pub use translate::run_translate;
pub use videos::run_videos;
