use std::sync::Arc;

use crate::app::ports::HttpClientPort;
use crate::common::error::Result;
use crate::domain::{FetchedMetadata, PlatformKind, RemoteIdentifier};

pub mod niconico;
pub mod twitter;
pub mod youtube;

use self::niconico::NiconicoFetcher;
use self::twitter::TwitterFetcher;
use self::youtube::YouTubeFetcher;

/// Dispatches a canonical identifier to the matching platform fetcher.
/// Both YouTube kinds share one fetcher; the distinction matters only
/// downstream, at normalization and upsert.
pub struct MetadataFetcher {
    youtube: YouTubeFetcher,
    niconico: NiconicoFetcher,
    twitter: TwitterFetcher,
}

impl MetadataFetcher {
    pub fn new(http: Arc<dyn HttpClientPort>, youtube_api_key: Option<String>) -> Self {
        Self {
            youtube: YouTubeFetcher::new(http.clone(), youtube_api_key),
            niconico: NiconicoFetcher::new(http.clone()),
            twitter: TwitterFetcher::new(http),
        }
    }

    pub async fn fetch(&self, identifier: &RemoteIdentifier) -> Result<FetchedMetadata> {
        match identifier.platform {
            PlatformKind::YouTubeLive | PlatformKind::YouTubeVideo => {
                Ok(FetchedMetadata::YouTube(self.youtube.fetch(identifier).await?))
            }
            PlatformKind::NiconicoVideo => {
                Ok(FetchedMetadata::Niconico(self.niconico.fetch(identifier).await?))
            }
            PlatformKind::TwitterPost => {
                Ok(FetchedMetadata::Twitter(self.twitter.fetch(identifier).await?))
            }
        }
    }
}
