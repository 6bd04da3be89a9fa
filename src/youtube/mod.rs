//! Channel browsing through the official YouTube Data API.

mod channel;
mod models;

pub use channel::ChannelClient;
pub use models::{ChannelResolution, VideoDetails, VideoPage, VideoSummary};
