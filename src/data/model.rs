// Domain views served by the proxy endpoint.
// Field names on the wire follow the upstream's snake_case naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organization profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(rename = "public_repos")]
    pub public_repo_count: u64,
}

/// Repository card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(rename = "stargazers_count")]
    pub star_count: u64,
    #[serde(rename = "forks_count")]
    pub fork_count: u64,
    #[serde(rename = "language")]
    pub primary_language: Option<String>,
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Truncated repository list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryList {
    pub repos: Vec<Repository>,
    /// Count after filtering but before truncation.
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

impl RepositoryList {
    /// Whether the upstream has more repositories than were returned.
    pub fn has_more(&self) -> bool {
        self.total_count > self.repos.len()
    }
}
