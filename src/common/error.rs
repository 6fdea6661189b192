use thiserror::Error;

/// Failure taxonomy for the ingestion pipeline. Variants are grouped by who
/// can fix them: the operator (`InvalidIdentifier`, association errors), the
/// upstream platform (`UpstreamUnavailable`, `NotFound`,
/// `MalformedUpstreamResponse`), or the datastore
/// (`ConflictResolutionFailed`, `Unauthorized`).
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("remote item not found: {0}")]
    NotFound(String),

    #[error("malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    /// Embed markup still contained executable script content after the
    /// well-known widget-loader tag was stripped. Never persisted.
    #[error("unsafe embed markup: {0}")]
    UnsafeEmbedMarkup(String),

    #[error("association not found: {0}")]
    AssociationNotFound(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("conflict resolution failed: {0}")]
    ConflictResolutionFailed(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
