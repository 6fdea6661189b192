use async_trait::async_trait;
use serde_json::json;

use crate::app::ports::{GraphqlEnvelope, GraphqlPort, GraphqlRequest};
use crate::common::constants::HASURA_ADMIN_SECRET_HEADER;
use crate::common::error::{IngestError, Result};

/// Hasura GraphQL adapter. The admin-secret write credential is attached to
/// mutations only; read-only queries go out bare.
pub struct HasuraGraphql {
    client: reqwest::Client,
    endpoint: String,
    admin_secret: Option<String>,
}

impl HasuraGraphql {
    pub fn new(endpoint: String, admin_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            admin_secret,
        }
    }

    async fn post(&self, request: GraphqlRequest, with_secret: bool) -> Result<GraphqlEnvelope> {
        let mut builder = self.client.post(&self.endpoint).json(&json!({
            "query": request.query,
            "variables": request.variables,
        }));
        if with_secret {
            let secret = self.admin_secret.as_deref().ok_or_else(|| {
                IngestError::Config("AMATERUS_HASURA_ADMIN_SECRET is not set".to_string())
            })?;
            builder = builder.header(HASURA_ADMIN_SECRET_HEADER, secret);
        }
        let response = builder.send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(IngestError::Unauthorized(format!(
                "datastore rejected the request with status {}",
                response.status()
            )));
        }
        let response = response.error_for_status()?;
        let envelope: GraphqlEnvelope = response.json().await?;
        Ok(envelope)
    }
}

#[async_trait]
impl GraphqlPort for HasuraGraphql {
    async fn query(&self, request: GraphqlRequest) -> Result<GraphqlEnvelope> {
        self.post(request, false).await
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<GraphqlEnvelope> {
        self.post(request, true).await
    }
}
