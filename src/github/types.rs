// GitHub API response types.
// Raw payloads as returned by the organization and repository endpoints.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// GitHub organization, as returned by `GET /orgs/{org}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrganization {
    pub login: String,
    /// Organizations without a display name return null.
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u64,
}

/// GitHub repository, as returned by `GET /orgs/{org}/repos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRepository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Read rate limit headers, returning None when the upstream sent none.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        let remaining = read("x-ratelimit-remaining")?;
        Some(Self {
            limit: read("x-ratelimit-limit").unwrap_or_default(),
            remaining,
            reset: read("x-ratelimit-reset").unwrap_or_default(),
        })
    }

    /// Reset time formatted for logs.
    pub fn reset_at(&self) -> String {
        DateTime::from_timestamp(self.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
