//! Transcript extraction orchestrator for Tubescribe.
//!
//! Sequences track resolution, track selection and caption download for one
//! video, and fans that out over a batch of videos.

use crate::config::TranscriptSettings;
use crate::error::{Result, ScribeError};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::transcript::{select_track, CaptionFetcher, CaptionTrackResolver, TranscriptResult};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Extracts transcripts for videos, one result per video.
pub struct TranscriptExtractor {
    resolver: CaptionTrackResolver,
    fetcher: CaptionFetcher,
    max_concurrent: usize,
}

impl TranscriptExtractor {
    /// Create an extractor backed by a real HTTP client.
    pub fn new(settings: &TranscriptSettings) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(settings)?);
        Ok(Self::with_transport(transport, settings))
    }

    /// Create an extractor over a custom transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, settings: &TranscriptSettings) -> Self {
        Self {
            resolver: CaptionTrackResolver::new(transport.clone(), settings),
            fetcher: CaptionFetcher::new(transport),
            max_concurrent: settings.max_concurrent.max(1),
        }
    }

    /// Extract the transcript of one video.
    ///
    /// Never fails: every error becomes a result with `success = false`.
    #[instrument(skip(self))]
    pub async fn extract(&self, video_id: &str) -> TranscriptResult {
        let mut title = String::new();

        match self.try_extract(video_id, &mut title).await {
            Ok(transcript) => {
                info!("Extracted {} lines for '{}'", transcript.lines().count(), title);
                TranscriptResult::success(video_id, title, transcript)
            }
            Err(e) => {
                warn!("Transcript extraction failed for {}: {}", video_id, e);
                TranscriptResult::failure(video_id, title, e.to_string())
            }
        }
    }

    /// Resolve, select and fetch. `title` is filled in as soon as it is known so
    /// that later failures still report it.
    async fn try_extract(&self, video_id: &str, title: &mut String) -> Result<String> {
        let resolved = self.resolver.resolve(video_id).await?;
        *title = resolved.title;

        let track = select_track(&resolved.tracks).ok_or(ScribeError::NoCaptions)?;
        if track.base_url.is_empty() {
            return Err(ScribeError::Fetch {
                reason: format!("caption track '{}' has no fetch URL", track.language_code),
                transient: false,
            });
        }

        let transcript = self.fetcher.fetch(&track.base_url).await?;
        if transcript.is_empty() {
            return Err(ScribeError::EmptyTranscript);
        }

        Ok(transcript)
    }

    /// Extract transcripts for a batch of videos.
    ///
    /// Up to `max_concurrent` videos are in flight at once. Results come back in
    /// input order, one per identifier, whatever the individual outcomes.
    #[instrument(skip(self, video_ids), fields(count = video_ids.len()))]
    pub async fn extract_batch(&self, video_ids: &[String]) -> Vec<TranscriptResult> {
        let mut results: Vec<(usize, TranscriptResult)> = stream::iter(video_ids.iter().cloned().enumerate())
            .map(|(idx, video_id)| async move { (idx, self.extract(&video_id).await) })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        results.sort_by_key(|(idx, _)| *idx);

        let succeeded = results.iter().filter(|(_, r)| r.success).count();
        info!("Batch finished: {}/{} transcripts extracted", succeeded, results.len());

        results.into_iter().map(|(_, r)| r).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::MockTransport;
    use serde_json::json;

    fn watch_page(key: &str) -> String {
        format!(r#"<script>var ytcfg = {{"INNERTUBE_API_KEY":"{}"}};</script>"#, key)
    }

    fn player(title: &str, tracks: serde_json::Value) -> serde_json::Value {
        json!({
            "videoDetails": { "title": title },
            "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": tracks } }
        })
    }

    fn extractor(transport: MockTransport, max_concurrent: usize) -> TranscriptExtractor {
        let settings = TranscriptSettings {
            max_concurrent,
            ..TranscriptSettings::default()
        };
        TranscriptExtractor::with_transport(Arc::new(transport), &settings)
    }

    /// A transport serving one captioned video, `good`, whose player response
    /// lists an English ASR track before an English manual one.
    fn good_video(transport: MockTransport) -> MockTransport {
        transport
            .text("watch?v=good", &watch_page("KEY_GOOD"))
            .json(
                "player?key=KEY_GOOD",
                player(
                    "Good Video",
                    json!([
                        { "languageCode": "en", "kind": "asr", "baseUrl": "https://tt/asr?v=good" },
                        { "languageCode": "es", "baseUrl": "https://tt/es?v=good" },
                        { "languageCode": "en", "baseUrl": "https://tt/manual?v=good" }
                    ]),
                ),
            )
            .json(
                "tt/manual?v=good&fmt=json3",
                json!({ "events": [
                    { "segs": [{ "utf8": "Hello " }, { "utf8": "world" }] },
                    { "segs": [{ "utf8": "  " }] },
                    { "segs": [{ "utf8": "Bye" }] }
                ] }),
            )
    }

    #[tokio::test]
    async fn test_extract_success_uses_english_manual_track() {
        let ex = extractor(good_video(MockTransport::new()), 1);

        let result = ex.extract("good").await;
        assert!(result.success);
        assert_eq!(result.title, "Good Video");
        assert_eq!(result.transcript, "Hello world\nBye");
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_extract_no_captions_keeps_title() {
        let transport = MockTransport::new()
            .text("watch?v=silent", &watch_page("K"))
            .json("player?key=K", json!({ "videoDetails": { "title": "Silent" } }));

        let result = extractor(transport, 1).extract("silent").await;
        assert!(!result.success);
        assert_eq!(result.title, "Silent");
        assert_eq!(result.error.as_deref(), Some("No captions available for this video"));
        assert!(result.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_extract_empty_transcript() {
        let transport = MockTransport::new()
            .text("watch?v=blank", &watch_page("K"))
            .json(
                "player?key=K",
                player("Blank", json!([{ "languageCode": "en", "baseUrl": "https://tt/blank?v=1" }])),
            )
            .json(
                "tt/blank",
                json!({ "events": [{ "segs": [{ "utf8": " " }] }, { "segs": [{ "utf8": "\n" }] }] }),
            );

        let result = extractor(transport, 1).extract("blank").await;
        assert!(!result.success);
        assert_eq!(result.title, "Blank");
        assert_eq!(result.error.as_deref(), Some("Transcript is empty"));
    }

    #[tokio::test]
    async fn test_extract_resolver_failure_leaves_title_empty() {
        let transport = MockTransport::new().text("watch?v=private", "<html>Private video</html>");

        let result = extractor(transport, 1).extract("private").await;
        assert!(!result.success);
        assert!(result.title.is_empty());
        assert!(result.error.unwrap().contains("INNERTUBE_API_KEY"));
    }

    #[tokio::test]
    async fn test_extract_fetch_failure_keeps_title() {
        let transport = MockTransport::new()
            .text("watch?v=gone", &watch_page("K"))
            .json(
                "player?key=K",
                player("Gone", json!([{ "languageCode": "en", "baseUrl": "https://tt/gone?v=1" }])),
            )
            .status("tt/gone", 404);

        let result = extractor(transport, 1).extract("gone").await;
        assert!(!result.success);
        assert_eq!(result.title, "Gone");
        assert!(result.error.unwrap().starts_with("Fetch failed"));
    }

    #[tokio::test]
    async fn test_extract_track_without_url_is_fetch_failure() {
        let transport = MockTransport::new()
            .text("watch?v=nourl", &watch_page("K"))
            .json(
                "player?key=K",
                player("No URL", json!([{ "languageCode": "en", "baseUrl": "" }])),
            );
        let transport = Arc::new(transport);
        let ex = TranscriptExtractor::with_transport(transport.clone(), &TranscriptSettings::default());

        let result = ex.extract("nourl").await;
        assert!(!result.success);
        assert_eq!(result.title, "No URL");
        assert!(result.error.unwrap().starts_with("Fetch failed"));
        assert!(!transport.requests().iter().any(|url| url.contains("fmt=json3")));
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        for max_concurrent in [1, 4] {
            let ex = extractor(
                good_video(MockTransport::new()).text("watch?v=broken", "<html>no key here</html>"),
                max_concurrent,
            );
            let ids: Vec<String> = ["broken", "good", "broken", "good"]
                .iter()
                .map(|s| s.to_string())
                .collect();

            let results = ex.extract_batch(&ids).await;
            assert_eq!(results.len(), 4);
            for (id, result) in ids.iter().zip(&results) {
                assert_eq!(&result.video_id, id);
                assert_eq!(result.success, id == "good");
            }
            assert!(matches!(results[0].error.as_deref(), Some(e) if e.contains("INNERTUBE_API_KEY")));
            assert_eq!(results[1].transcript, "Hello world\nBye");
        }
    }

    #[tokio::test]
    async fn test_batch_empty_input() {
        let ex = extractor(MockTransport::new(), 3);
        assert!(ex.extract_batch(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_is_idempotent() {
        let ex = extractor(good_video(MockTransport::new()), 1);
        let first = ex.extract("good").await;
        let second = ex.extract("good").await;
        assert_eq!(first, second);
    }
}
