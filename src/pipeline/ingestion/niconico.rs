use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::instrument;

use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::constants::{
    NICONICO_USER_AGENT, NICONICO_WATCH_BASE, NICONICO_WATCH_DATA_ATTR,
    NICONICO_WATCH_DATA_SELECTOR,
};
use crate::common::error::{IngestError, Result};
use crate::domain::{NiconicoVideoMetadata, RemoteIdentifier};

static WATCH_DATA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(NICONICO_WATCH_DATA_SELECTOR).unwrap());

/// Fetches video metadata by scraping the Niconico watch page. The page
/// embeds its API payload as JSON in a data attribute; there is no public
/// REST endpoint for this.
pub struct NiconicoFetcher {
    http: Arc<dyn HttpClientPort>,
}

#[derive(Debug, Deserialize)]
struct WatchData {
    video: WatchDataVideo,
    owner: WatchDataOwner,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatchDataVideo {
    id: String,
    title: String,
    registered_at: DateTime<FixedOffset>,
    thumbnail: WatchDataThumbnail,
}

#[derive(Debug, Deserialize)]
struct WatchDataThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct WatchDataOwner {
    id: i64,
    nickname: String,
}

impl NiconicoFetcher {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, identifier: &RemoteIdentifier) -> Result<NiconicoVideoMetadata> {
        let url = format!("{}/{}", NICONICO_WATCH_BASE, identifier.canonical_id);
        // The UA is load-bearing: Niconico serves a different page shape to
        // unrecognized clients.
        let request = HttpGetRequest::new(url).header("User-Agent", NICONICO_USER_AGENT);
        let response = self.http.get(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(IngestError::UpstreamUnavailable(format!(
                "Niconico watch page returned status {}",
                response.status
            )));
        }

        parse_watch_page(&response.body)
    }
}

/// Extracts the embedded-data attribute from the watch page HTML and parses
/// its JSON payload. Either being absent is a malformed response.
pub fn parse_watch_page(html: &str) -> Result<NiconicoVideoMetadata> {
    let document = Html::parse_document(html);
    let element = document.select(&WATCH_DATA_SELECTOR).next().ok_or_else(|| {
        IngestError::MalformedUpstreamResponse(format!(
            "watch page has no {NICONICO_WATCH_DATA_SELECTOR} element"
        ))
    })?;
    let payload = element
        .value()
        .attr(NICONICO_WATCH_DATA_ATTR)
        .ok_or_else(|| {
            IngestError::MalformedUpstreamResponse(format!(
                "watch data element has no {NICONICO_WATCH_DATA_ATTR} attribute"
            ))
        })?;

    let watch_data: WatchData = serde_json::from_str(payload).map_err(|e| {
        IngestError::MalformedUpstreamResponse(format!("watch data payload: {e}"))
    })?;

    Ok(NiconicoVideoMetadata {
        remote_content_id: watch_data.video.id,
        title: watch_data.video.title,
        registered_at: watch_data.video.registered_at,
        thumbnail_url: watch_data.video.thumbnail.url,
        owner_id: watch_data.owner.id,
        owner_name: watch_data.owner.nickname,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch_page(api_data: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><body><div id="js-initial-watch-data" data-api-data="{}"></div></body></html>"#,
            api_data.replace('"', "&quot;")
        )
    }

    #[test]
    fn parses_embedded_watch_data() {
        let api_data = r#"{"video":{"id":"sm12345","title":"A video","registeredAt":"2023-04-01T21:00:00+09:00","thumbnail":{"url":"https://img.example/thumb.jpg"}},"owner":{"id":9876,"nickname":"uploader"}}"#;
        let metadata = parse_watch_page(&watch_page(api_data)).unwrap();

        assert_eq!(metadata.remote_content_id, "sm12345");
        assert_eq!(metadata.title, "A video");
        assert_eq!(metadata.thumbnail_url, "https://img.example/thumb.jpg");
        assert_eq!(metadata.owner_id, 9876);
        assert_eq!(metadata.owner_name, "uploader");
        assert_eq!(metadata.registered_at.to_rfc3339(), "2023-04-01T21:00:00+09:00");
    }

    #[test]
    fn missing_watch_data_element_is_malformed() {
        let err = parse_watch_page("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, IngestError::MalformedUpstreamResponse(_)));
    }

    #[test]
    fn bad_json_payload_is_malformed() {
        let err = parse_watch_page(&watch_page("{not json")).unwrap_err();
        assert!(matches!(err, IngestError::MalformedUpstreamResponse(_)));
    }
}
