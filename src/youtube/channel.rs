//! YouTube Data API v3 client for a single channel.

use super::models::{
    ChannelItem, ChannelResolution, ListResponse, PlaylistItem, SearchItem, VideoDetails,
    VideoItem, VideoPage, VideoSummary,
};
use crate::config::YoutubeSettings;
use crate::error::{Result, ScribeError};
use crate::http::HttpTransport;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Client for channel lookup, listing and search.
pub struct ChannelClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl ChannelClient {
    /// Create a client. Fails if no Data API key is configured.
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &YoutubeSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ScribeError::Config(
                    "YouTube API key not set. Set YOUTUBE_API_KEY or youtube.api_key".to_string(),
                )
            })?;

        Ok(Self {
            transport,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Call a Data API resource and decode its list response.
    async fn call<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<ListResponse<T>> {
        let mut url = url::Url::parse(&format!("{}/{}", self.base_url, resource))
            .map_err(|e| ScribeError::Config(format!("Invalid YouTube API URL: {}", e)))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("key", &self.api_key);

        let body = self
            .transport
            .get_json(url.as_str())
            .await
            .map_err(|e| ScribeError::YoutubeApi(format!("{}: {}", resource, e)))?;

        serde_json::from_value(body)
            .map_err(|e| ScribeError::YoutubeApi(format!("{}: unexpected response: {}", resource, e)))
    }

    /// Resolve a channel handle such as `@RafTalks` to a channel ID.
    ///
    /// Falls back to a channel search when the handle lookup finds nothing.
    #[instrument(skip(self))]
    pub async fn resolve_handle(&self, handle: &str) -> Result<ChannelResolution> {
        let handle = if handle.starts_with('@') {
            handle.to_string()
        } else {
            format!("@{}", handle)
        };

        let channels: ListResponse<ChannelItem> = self
            .call("channels", &[("part", "id,snippet"), ("forHandle", handle.as_str())])
            .await?;
        if let Some(channel) = channels.items.into_iter().next() {
            info!("Resolved {} to channel {}", handle, channel.id);
            return Ok(ChannelResolution::ByHandle(channel.id));
        }

        debug!("Handle lookup for {} found nothing, searching", handle);
        let search: ListResponse<SearchItem> = self
            .call(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", handle.as_str()),
                    ("type", "channel"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        match search.items.into_iter().find_map(|item| item.id.channel_id) {
            Some(id) => {
                warn!("Resolved {} to channel {} via search fallback", handle, id);
                Ok(ChannelResolution::BySearch(id))
            }
            None => Ok(ChannelResolution::Unresolved),
        }
    }

    /// List a page of the channel's uploads, newest first.
    #[instrument(skip(self))]
    pub async fn channel_videos(
        &self,
        channel_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<VideoPage> {
        let channels: ListResponse<ChannelItem> = self
            .call("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        let uploads = channels
            .items
            .into_iter()
            .next()
            .and_then(|c| c.content_details)
            .and_then(|d| d.related_playlists.uploads);

        let Some(uploads) = uploads else {
            warn!("Channel {} not found or has no uploads playlist", channel_id);
            return Ok(VideoPage::default());
        };

        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", uploads.as_str()),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let page: ListResponse<PlaylistItem> = self.call("playlistItems", &params).await?;

        let ids: Vec<String> = page
            .items
            .iter()
            .map(|item| item.content_details.video_id.clone())
            .collect();
        let views = self.view_counts(&ids).await?;

        let videos = page
            .items
            .into_iter()
            .map(|item| {
                let video_id = item.content_details.video_id;
                VideoSummary {
                    view_count: view_count(&views, &video_id),
                    title: item.snippet.title,
                    thumbnail_url: item.snippet.thumbnails.best_url(),
                    published_at: item.snippet.published_at,
                    video_id,
                }
            })
            .collect();

        Ok(VideoPage {
            videos,
            next_page_token: page.next_page_token,
        })
    }

    /// Search the channel's videos, newest first.
    #[instrument(skip(self))]
    pub async fn search_channel(
        &self,
        channel_id: &str,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<VideoPage> {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("channelId", channel_id),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("order", "date"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let page: ListResponse<SearchItem> = self.call("search", &params).await?;

        let ids: Vec<String> = page
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();
        let views = self.view_counts(&ids).await?;

        let videos = page
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(VideoSummary {
                    view_count: view_count(&views, &video_id),
                    title: item.snippet.title,
                    thumbnail_url: item.snippet.thumbnails.best_url(),
                    published_at: item.snippet.published_at,
                    video_id,
                })
            })
            .collect();

        Ok(VideoPage {
            videos,
            next_page_token: page.next_page_token,
        })
    }

    /// Fetch title, thumbnail, publish date and duration for a set of videos.
    #[instrument(skip(self, video_ids), fields(count = video_ids.len()))]
    pub async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetails>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = video_ids.join(",");
        let response: ListResponse<VideoItem> = self
            .call("videos", &[("part", "snippet,contentDetails"), ("id", ids.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| VideoDetails {
                video_id: item.id,
                title: item.snippet.title,
                thumbnail_url: item.snippet.thumbnails.best_url(),
                published_at: item.snippet.published_at,
                duration: item.content_details.duration,
            })
            .collect())
    }

    /// View counts keyed by video ID, from a single statistics call.
    async fn view_counts(&self, video_ids: &[String]) -> Result<HashMap<String, String>> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = video_ids.join(",");
        let response: ListResponse<VideoItem> = self
            .call("videos", &[("part", "statistics"), ("id", ids.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.statistics.view_count.map(|count| (item.id, count)))
            .collect())
    }
}

fn view_count(views: &HashMap<String, String>, video_id: &str) -> String {
    views.get(video_id).cloned().unwrap_or_else(|| "0".to_string())
}
