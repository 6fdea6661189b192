use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::common::error::Result;

#[derive(Debug, Clone, Default)]
pub struct HttpGetRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpGetRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpGetResponse {
    pub status: u16,
    pub body: String,
}

/// Outbound HTTP seam. Platform fetchers depend on this so tests can
/// substitute canned responses.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, request: HttpGetRequest) -> Result<HttpGetResponse>;
}

#[derive(Debug, Clone)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: &str, variables: Value) -> Self {
        Self {
            query: query.to_string(),
            variables,
        }
    }
}

/// The standard GraphQL response envelope. A `null` top-level entity inside
/// `data` is a distinct failure from a transport error; callers inspect it.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlEnvelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
}

/// Datastore seam. Reads and writes are separate methods because only
/// mutations may carry the admin-secret write credential.
#[async_trait]
pub trait GraphqlPort: Send + Sync {
    async fn query(&self, request: GraphqlRequest) -> Result<GraphqlEnvelope>;
    async fn mutate(&self, request: GraphqlRequest) -> Result<GraphqlEnvelope>;
}
