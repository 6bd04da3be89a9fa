//! YouTube Data API v3 response shapes and the records built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the configured channel handle was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "channel_id", rename_all = "snake_case")]
pub enum ChannelResolution {
    /// The handle lookup returned the channel directly.
    ByHandle(String),
    /// The handle lookup failed and a channel search matched instead.
    BySearch(String),
    /// Neither lookup matched a channel.
    Unresolved,
}

impl ChannelResolution {
    /// The channel ID, if resolution succeeded by any route.
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            ChannelResolution::ByHandle(id) | ChannelResolution::BySearch(id) => Some(id),
            ChannelResolution::Unresolved => None,
        }
    }
}

/// A video as listed in the channel browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
    /// View count as reported by the API (a decimal string).
    pub view_count: String,
}

/// One page of a listing or search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoPage {
    pub videos: Vec<VideoSummary>,
    pub next_page_token: Option<String>,
}

/// Detailed information about a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
    /// ISO-8601 duration, e.g. `PT12M3S`.
    pub duration: String,
}

// === Raw API shapes ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ListResponse<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ChannelItem {
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SearchItem {
    pub id: SearchId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SearchId {
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlaylistItem {
    pub snippet: Snippet,
    pub content_details: PlaylistContentDetails,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlaylistContentDetails {
    pub video_id: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct VideoItem {
    pub id: String,
    pub snippet: Snippet,
    pub statistics: Statistics,
    pub content_details: VideoContentDetails,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Statistics {
    pub view_count: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct VideoContentDetails {
    pub duration: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Snippet {
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct Thumbnail {
    pub url: String,
}

impl Thumbnails {
    /// High resolution thumbnail, or the default one when missing.
    pub fn best_url(&self) -> String {
        self.high
            .as_ref()
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_channel_id() {
        assert_eq!(ChannelResolution::ByHandle("UC1".into()).channel_id(), Some("UC1"));
        assert_eq!(ChannelResolution::BySearch("UC2".into()).channel_id(), Some("UC2"));
        assert_eq!(ChannelResolution::Unresolved.channel_id(), None);
    }

    #[test]
    fn test_snippet_parses_timestamp() {
        let snippet: Snippet = serde_json::from_value(serde_json::json!({
            "title": "Clip",
            "publishedAt": "2025-10-01T17:30:00Z",
            "thumbnails": { "default": { "url": "https://i/default.jpg" } }
        }))
        .unwrap();

        assert_eq!(snippet.title, "Clip");
        assert_eq!(
            snippet.published_at.unwrap().to_rfc3339(),
            "2025-10-01T17:30:00+00:00"
        );
        assert_eq!(snippet.thumbnails.best_url(), "https://i/default.jpg");
    }

    /// Decodes like `ChannelClient::call`: generic over `DeserializeOwned` only.
    fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> ListResponse<T> {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_list_response_items_need_no_default() {
        #[derive(Debug, Deserialize)]
        struct Item {
            id: String,
        }

        let page: ListResponse<Item> =
            decode(serde_json::json!({ "items": [{ "id": "v1" }], "nextPageToken": "N" }));
        assert_eq!(page.items[0].id, "v1");
        assert_eq!(page.next_page_token.as_deref(), Some("N"));

        let empty: ListResponse<Item> = decode(serde_json::json!({}));
        assert!(empty.items.is_empty());
        assert!(empty.next_page_token.is_none());
    }
}
