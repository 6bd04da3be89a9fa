//! Transcript extraction through YouTube's internal player API.
//!
//! - `resolver` discovers the caption tracks of a video via InnerTube
//! - `fetcher` downloads one track as `json3` and flattens it to text
//!
//! The pieces are sequenced by [`crate::orchestrator::TranscriptExtractor`].

mod fetcher;
mod resolver;

pub use fetcher::{flatten_events, CaptionFetcher, CaptionPayload};
pub use resolver::{extract_api_key, parse_player_response, CaptionTrackResolver, ResolvedVideo};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Language code treated as the preferred transcript language.
pub const PREFERRED_LANGUAGE: &str = "en";

/// `kind` value InnerTube uses for automatic speech recognition tracks.
pub const ASR_KIND: &str = "asr";

/// One selectable caption track of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    #[serde(default)]
    pub language_code: String,
    /// `"asr"` for machine-generated tracks, usually absent otherwise.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub base_url: String,
}

impl CaptionTrack {
    /// Whether the track was produced by speech recognition.
    ///
    /// Only the exact value `"asr"` counts; any other kind, or none, is manual.
    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some(ASR_KIND)
    }

    fn preference(&self) -> (u8, u8) {
        (
            u8::from(self.language_code != PREFERRED_LANGUAGE),
            u8::from(self.is_auto_generated()),
        )
    }
}

/// Pick the track to transcribe.
///
/// English beats other languages, then human-authored beats ASR. Ties keep
/// the order the API returned them in.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    // min_by_key returns the first of several equal minima
    tracks.iter().min_by_key(|t| t.preference())
}

/// Extract the video ID from a YouTube URL or a bare 11-character ID.
pub fn parse_video_id(input: &str) -> Option<String> {
    static VIDEO_ID_RE: OnceLock<Regex> = OnceLock::new();
    let re = VIDEO_ID_RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("valid video ID regex")
    });

    let caps = re.captures(input.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Outcome of extracting one video's transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub video_id: String,
    pub title: String,
    pub transcript: String,
    pub success: bool,
    pub error: Option<String>,
}

impl TranscriptResult {
    /// A successful result.
    pub fn success(video_id: &str, title: String, transcript: String) -> Self {
        Self {
            video_id: video_id.to_string(),
            title,
            transcript,
            success: true,
            error: None,
        }
    }

    /// A failed result. `title` is whatever was resolved before the failure.
    pub fn failure(video_id: &str, title: String, error: impl Into<String>) -> Self {
        Self {
            video_id: video_id.to_string(),
            title,
            transcript: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}
