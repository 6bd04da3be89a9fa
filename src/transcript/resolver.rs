//! Caption track discovery via the InnerTube player endpoint.

use super::CaptionTrack;
use crate::config::TranscriptSettings;
use crate::error::{Result, ScribeError};
use crate::http::HttpTransport;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, instrument};

const UNKNOWN_TITLE: &str = "Unknown Title";

/// Title and caption tracks of one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVideo {
    pub title: String,
    /// Tracks in the order the player API listed them.
    pub tracks: Vec<CaptionTrack>,
}

/// Resolves the caption tracks of a video without the official captions API.
pub struct CaptionTrackResolver {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    client_version: String,
}

impl CaptionTrackResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &TranscriptSettings) -> Self {
        Self {
            transport,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client_version: settings.client_version.clone(),
        }
    }

    /// Fetch the watch page, pull the InnerTube key out of it and ask the
    /// player endpoint for the video's caption tracks.
    #[instrument(skip(self))]
    pub async fn resolve(&self, video_id: &str) -> Result<ResolvedVideo> {
        if video_id.trim().is_empty() {
            return Err(ScribeError::InvalidInput("empty video ID".to_string()));
        }

        let watch_url = url::Url::parse_with_params(
            &format!("{}/watch", self.base_url),
            &[("v", video_id)],
        )
        .map_err(|e| ScribeError::Config(format!("Invalid base URL: {}", e)))?;

        let page = self.transport.get_text(watch_url.as_str()).await?;
        let api_key = extract_api_key(&page)?;

        let player_url = url::Url::parse_with_params(
            &format!("{}/youtubei/v1/player", self.base_url),
            &[("key", api_key.as_str())],
        )
        .map_err(|e| ScribeError::Config(format!("Invalid base URL: {}", e)))?;

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "WEB",
                    "clientVersion": self.client_version,
                }
            },
            "videoId": video_id,
        });

        let response = self.transport.post_json(player_url.as_str(), &body).await?;
        let resolved = parse_player_response(response)?;

        debug!(
            "Resolved '{}' with {} caption tracks",
            resolved.title,
            resolved.tracks.len()
        );
        Ok(resolved)
    }
}

/// Pull the InnerTube API key embedded in a watch page.
pub fn extract_api_key(page: &str) -> Result<String> {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_RE.get_or_init(|| {
        Regex::new(r#""INNERTUBE_API_KEY":"([^"]+)""#).expect("valid INNERTUBE_API_KEY regex")
    });

    re.captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            ScribeError::KeyExtraction(
                "marker not found in watch page (video unavailable or page layout changed)"
                    .to_string(),
            )
        })
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PlayerResponse {
    video_details: Option<VideoDetails>,
    captions: Option<Captions>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TracklistRenderer {
    caption_tracks: Vec<CaptionTrack>,
}

/// Read the title and caption tracks out of a player response.
///
/// Missing pieces degrade to defaults: no title gives "Unknown Title" and no
/// captions block gives an empty track list.
pub fn parse_player_response(response: serde_json::Value) -> Result<ResolvedVideo> {
    let player: PlayerResponse = serde_json::from_value(response)?;

    let title = player
        .video_details
        .and_then(|d| d.title)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    Ok(ResolvedVideo { title, tracks })
}
