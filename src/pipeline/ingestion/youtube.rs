use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::constants::{YOUTUBE_API_PARTS, YOUTUBE_VIDEOS_API};
use crate::common::error::{IngestError, Result};
use crate::domain::{RemoteIdentifier, YouTubeVideoMetadata};

/// Fetches authoritative video metadata from the YouTube Data API.
/// One GET per canonical video ID; the same endpoint serves both live
/// archives and plain videos.
pub struct YouTubeFetcher {
    http: Arc<dyn HttpClientPort>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

// `snippet` and `liveStreamingDetails` are independently nullable; a video
// that never streamed simply has no live-streaming details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Option<Snippet>,
    live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_id: String,
    channel_title: String,
    published_at: Option<DateTime<FixedOffset>>,
    live_broadcast_content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveStreamingDetails {
    actual_start_time: Option<DateTime<FixedOffset>>,
    actual_end_time: Option<DateTime<FixedOffset>>,
}

impl YouTubeFetcher {
    pub fn new(http: Arc<dyn HttpClientPort>, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, identifier: &RemoteIdentifier) -> Result<YouTubeVideoMetadata> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            IngestError::Config("AMATERUS_YOUTUBE_API_KEY is not set".to_string())
        })?;

        let request = HttpGetRequest::new(YOUTUBE_VIDEOS_API)
            .query("key", api_key)
            .query("part", YOUTUBE_API_PARTS)
            .query("id", &identifier.canonical_id);
        let response = self.http.get(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(IngestError::UpstreamUnavailable(format!(
                "YouTube videos API returned status {}",
                response.status
            )));
        }

        let listing: VideoListResponse = serde_json::from_str(&response.body)
            .map_err(|e| IngestError::MalformedUpstreamResponse(format!(
                "YouTube videos API response: {e}"
            )))?;

        let item = listing.items.into_iter().next().ok_or_else(|| {
            IngestError::NotFound(format!(
                "no YouTube video for ID {}",
                identifier.canonical_id
            ))
        })?;
        debug!(video_id = %item.id, "fetched YouTube video item");

        Ok(parse_item(item))
    }
}

fn parse_item(item: VideoItem) -> YouTubeVideoMetadata {
    let (title, channel_id, channel_name, published_at, live_broadcast_content) =
        match item.snippet {
            Some(snippet) => (
                Some(snippet.title),
                Some(snippet.channel_id),
                Some(snippet.channel_title),
                snippet.published_at,
                snippet.live_broadcast_content,
            ),
            None => (None, None, None, None, None),
        };
    let (actual_start_time, actual_end_time) = match item.live_streaming_details {
        Some(details) => (details.actual_start_time, details.actual_end_time),
        None => (None, None),
    };

    YouTubeVideoMetadata {
        remote_video_id: item.id,
        title,
        channel_id,
        channel_name,
        published_at,
        live_broadcast_content,
        actual_start_time,
        actual_end_time,
    }
}
