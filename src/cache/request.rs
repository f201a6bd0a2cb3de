// Request and response values passing through the cache controller.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, Url, header::HeaderMap};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{MirrorError, Result};

/// Outbound request intercepted by the controller.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl Request {
    /// GET request without extra headers.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Parse an absolute URL into a GET request.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| MirrorError::InvalidRequest(format!("invalid URL '{}': {}", url, e)))?;
        Ok(Self::get(url))
    }

    /// Identity used to store and look up the response. The fragment is
    /// never sent, so it is not part of the identity.
    pub fn key(&self) -> RequestKey {
        let mut url = self.url.clone();
        url.set_fragment(None);
        RequestKey {
            method: self.method.as_str().to_string(),
            url: url.into(),
        }
    }
}

/// Cache key: method plus URL without its fragment.
///
/// Request headers are not part of the key. Storing under an existing key
/// replaces the previous entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    /// Stable hex digest, used for file names.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.method.as_bytes());
        hasher.update(b" ");
        hasher.update(self.url.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Fully buffered response, clonable so one copy can be stored while the
/// other is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    #[serde(skip)]
    pub body: Vec<u8>,
    /// When the response was received from the network.
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: Utc::now(),
        }
    }

    /// 2xx status.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `max-age` advertised by the origin's Cache-Control header.
    pub fn max_age(&self) -> Option<Duration> {
        self.header("cache-control")?
            .split(',')
            .filter_map(|directive| directive.trim().strip_prefix("max-age="))
            .find_map(|secs| secs.trim().parse().ok())
            .map(Duration::from_secs)
    }

    /// Whether the entry is still inside its advertised freshness window.
    /// Entries without a max-age are never fresh.
    pub fn is_fresh(&self) -> bool {
        let Some(max_age) = self.max_age() else {
            return false;
        };
        let elapsed = Utc::now()
            .signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        elapsed <= max_age
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Where a response handed to the consumer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
}

/// Response returned by an intercepted fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub response: CachedResponse,
    pub source: ResponseSource,
}

impl FetchResponse {
    /// Served from cache, so the consumer should show its offline state.
    pub fn is_offline(&self) -> bool {
        self.source == ResponseSource::Cache
    }
}
