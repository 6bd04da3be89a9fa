//! Videos command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::youtube::ChannelClient;
use anyhow::Result;
use std::sync::Arc;

/// Run the videos command.
pub async fn run_videos(
    query: Option<&str>,
    page_token: Option<&str>,
    limit: Option<u32>,
    settings: Settings,
) -> Result<()> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&settings.transcripts)?);
    let client = ChannelClient::new(transport, &settings.youtube)?;

    let handle = &settings.youtube.channel_handle;
    let resolution = client.resolve_handle(handle).await?;
    let Some(channel_id) = resolution.channel_id() else {
        Output::error(&format!("Could not find channel {}", handle));
        anyhow::bail!("Channel ID not set");
    };

    let max_results = limit.unwrap_or_else(|| settings.youtube.max_results()).clamp(1, 50);
    let page = match query {
        Some(q) => {
            client
                .search_channel(channel_id, q, max_results, page_token)
                .await?
        }
        None => {
            client
                .channel_videos(channel_id, max_results, page_token)
                .await?
        }
    };

    if page.videos.is_empty() {
        Output::info("No videos found.");
        return Ok(());
    }

    let heading = match query {
        Some(q) => format!("{} videos matching '{}' ({})", handle, q, page.videos.len()),
        None => format!("{} uploads ({})", handle, page.videos.len()),
    };
    Output::header(&heading);
    println!();

    for video in &page.videos {
        let published = video.published_at.map(|p| p.format("%Y-%m-%d").to_string());
        Output::video_info(&video.title, &video.video_id, published.as_deref(), &video.view_count);
    }

    if let Some(token) = &page.next_page_token {
        println!();
        Output::kv("Next page", &format!("--page-token {}", token));
    }

    Ok(())
}
