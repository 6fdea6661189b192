use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::constants::{TWITTER_OEMBED_API, TWITTER_STATUS_BASE, TWITTER_USER_AGENT};
use crate::common::error::{IngestError, Result};
use crate::domain::{RemoteIdentifier, TwitterPostMetadata};

/// Fetches tweet metadata from the publish.twitter.com oEmbed endpoint,
/// requesting the non-threaded single-post rendering.
pub struct TwitterFetcher {
    http: Arc<dyn HttpClientPort>,
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    author_url: String,
    author_name: String,
    url: String,
    html: String,
}

impl TwitterFetcher {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, identifier: &RemoteIdentifier) -> Result<TwitterPostMetadata> {
        let status_url = format!("{}/{}", TWITTER_STATUS_BASE, identifier.canonical_id);
        let request = HttpGetRequest::new(TWITTER_OEMBED_API)
            .query("url", &status_url)
            .query("partner", "")
            .query("hide_thread", "false")
            .header("User-Agent", TWITTER_USER_AGENT);
        let response = self.http.get(request).await?;
        if response.status == 404 {
            return Err(IngestError::NotFound(format!(
                "no tweet for ID {}",
                identifier.canonical_id
            )));
        }
        if !(200..300).contains(&response.status) {
            return Err(IngestError::UpstreamUnavailable(format!(
                "Twitter oEmbed endpoint returned status {}",
                response.status
            )));
        }

        let oembed: OembedResponse = serde_json::from_str(&response.body).map_err(|e| {
            IngestError::MalformedUpstreamResponse(format!("Twitter oEmbed response: {e}"))
        })?;

        Ok(TwitterPostMetadata {
            author_url: oembed.author_url,
            author_name: oembed.author_name,
            post_url: oembed.url,
            html: oembed.html,
        })
    }
}
