// Error types for orgmirror.
// Covers upstream API failures, cache population failures, and config errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream API returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Failed to populate cache with {url}: {reason}")]
    CachePopulation { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl MirrorError {
    /// HTTP status of an upstream failure, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            MirrorError::Upstream { status } => Some(*status),
            MirrorError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
