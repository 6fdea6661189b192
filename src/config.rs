use std::env;

use crate::common::error::{IngestError, Result};

/// Process configuration from the environment (a `.env` file is honored).
/// Values are loaded eagerly but validated lazily, so read-only commands
/// run without the YouTube API key or the write credential.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub hasura_endpoint: Option<String>,
    pub hasura_admin_secret: Option<String>,
}

impl AppConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self {
            youtube_api_key: non_empty_env("AMATERUS_YOUTUBE_API_KEY"),
            hasura_endpoint: non_empty_env("AMATERUS_HASURA_ENDPOINT"),
            hasura_admin_secret: non_empty_env("AMATERUS_HASURA_ADMIN_SECRET"),
        }
    }

    pub fn hasura_endpoint(&self) -> Result<&str> {
        self.hasura_endpoint.as_deref().ok_or_else(|| {
            IngestError::Config("AMATERUS_HASURA_ENDPOINT is not set".to_string())
        })
    }
}

/// Unset and empty are the same thing for our purposes.
fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
