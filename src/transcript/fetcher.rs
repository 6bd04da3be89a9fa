//! Caption payload download and flattening.

use crate::error::Result;
use crate::http::HttpTransport;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Structured caption format requested from the timedtext endpoint.
const CAPTION_FORMAT: &str = "json3";

/// A `json3` caption document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CaptionPayload {
    pub events: Vec<CaptionEvent>,
}

/// One timed caption event. Window/style events carry no `segs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CaptionEvent {
    pub segs: Option<Vec<CaptionSegment>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CaptionSegment {
    pub utf8: String,
}

/// Downloads a single caption track as plain text.
pub struct CaptionFetcher {
    transport: Arc<dyn HttpTransport>,
}

impl CaptionFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Fetch the track behind `base_url` and flatten it to newline-separated lines.
    ///
    /// An empty string is a valid result; callers decide what it means.
    #[instrument(skip(self, base_url))]
    pub async fn fetch(&self, base_url: &str) -> Result<String> {
        let url = caption_url(base_url);
        let body = self.transport.get_json(&url).await?;
        let payload: CaptionPayload = serde_json::from_value(body)?;

        let text = flatten_events(&payload);
        debug!(
            "Flattened {} caption events into {} lines",
            payload.events.len(),
            text.lines().count()
        );
        Ok(text)
    }
}

/// Append the format selector to a track reference.
fn caption_url(base_url: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}fmt={}", base_url, separator, CAPTION_FORMAT)
}

/// Join each event's segments into a trimmed line, skipping blank lines.
pub fn flatten_events(payload: &CaptionPayload) -> String {
    payload
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .map(|segs| segs.iter().map(|s| s.utf8.as_str()).collect::<String>())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
