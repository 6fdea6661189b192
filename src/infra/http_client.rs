use async_trait::async_trait;

use crate::app::ports::{HttpClientPort, HttpGetRequest, HttpGetResponse};
use crate::common::error::{IngestError, Result};

/// reqwest-backed HTTP adapter. Transport failures surface as
/// `UpstreamUnavailable`; non-2xx statuses are returned to the caller,
/// which owns the status contract per platform.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl Default for ReqwestHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestHttp {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, request: HttpGetRequest) -> Result<HttpGetResponse> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let response = builder.send().await.map_err(|e| {
            IngestError::UpstreamUnavailable(format!("GET {} failed: {e}", request.url))
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            IngestError::UpstreamUnavailable(format!("reading {} body failed: {e}", request.url))
        })?;
        Ok(HttpGetResponse { status, body })
    }
}
