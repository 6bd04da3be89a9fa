//! CLI module for Tubescribe.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tubescribe - YouTube transcript extraction and localization
///
/// Extracts caption transcripts from YouTube videos, browses a channel's uploads
/// and prepares translated production metadata.
#[derive(Parser, Debug)]
#[command(name = "tubescribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Extract transcripts for one or more videos
    Transcript {
        /// YouTube URLs or video IDs
        #[arg(required = true)]
        videos: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List or search the configured channel's videos
    Videos {
        /// Search the channel instead of listing uploads
        #[arg(short, long)]
        query: Option<String>,

        /// Page token from a previous listing
        #[arg(long)]
        page_token: Option<String>,

        /// Maximum number of videos (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Translate text into another language
    Translate {
        /// Text to translate
        text: String,

        /// Target language code (defaults to translation.default_target)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// List available models for production content
    Models,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_command() {
        let cli = Cli::parse_from(["tubescribe", "-vv", "transcript", "abc", "def", "--json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Transcript { videos, json } => {
                assert_eq!(videos, vec!["abc", "def"]);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_transcript_requires_video() {
        assert!(Cli::try_parse_from(["tubescribe", "transcript"]).is_err());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["tubescribe", "-c", "/tmp/c.toml", "serve", "--port", "8080"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.toml"));
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
