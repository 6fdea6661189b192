use std::sync::Arc;

use tracing::{info, instrument};

use crate::app::ports::HttpClientPort;
use crate::common::error::Result;
use crate::domain::{NormalizedArtifact, PlatformKind};
use crate::pipeline::ingestion::MetadataFetcher;
use crate::pipeline::{normalize, resolve};

/// The operator's "fetch metadata" action: resolve -> fetch -> derive.
/// Never writes; the operator reviews the result before the separate
/// submit action persists anything.
pub struct FetchUseCase {
    fetcher: MetadataFetcher,
}

impl FetchUseCase {
    pub fn new(http: Arc<dyn HttpClientPort>, youtube_api_key: Option<String>) -> Self {
        Self {
            fetcher: MetadataFetcher::new(http, youtube_api_key),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(
        &self,
        platform: PlatformKind,
        raw_input: &str,
    ) -> Result<NormalizedArtifact> {
        let identifier = resolve::resolve(platform, raw_input)?;
        let fetched = self.fetcher.fetch(&identifier).await?;
        let artifact = normalize::normalize(platform, fetched)?;
        info!(
            platform = platform.as_str(),
            remote_id = artifact.remote_id(),
            "fetched and normalized artifact"
        );
        Ok(artifact)
    }
}
