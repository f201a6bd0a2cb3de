// GitHub API endpoint functions.
// Typed fetches for the organization profile and its repository list.

use async_trait::async_trait;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{RawOrganization, RawRepository};

/// Query options for listing an organization's repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoQuery {
    pub sort: String,
    pub per_page: u32,
}

impl Default for RepoQuery {
    fn default() -> Self {
        Self {
            sort: "updated".to_string(),
            per_page: 50,
        }
    }
}

/// Source of organization and repository payloads.
///
/// Implementations must not retry; fallback policy belongs to the caller.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch_organization(&self, org: &str) -> Result<RawOrganization>;

    async fn fetch_repositories(&self, org: &str, query: &RepoQuery) -> Result<Vec<RawRepository>>;
}

#[async_trait]
impl Upstream for GitHubClient {
    async fn fetch_organization(&self, org: &str) -> Result<RawOrganization> {
        let response = self.get(&format!("/orgs/{}", org)).await?;
        let org: RawOrganization = response.json().await?;
        Ok(org)
    }

    async fn fetch_repositories(&self, org: &str, query: &RepoQuery) -> Result<Vec<RawRepository>> {
        let params = [
            ("sort", query.sort.clone()),
            ("per_page", query.per_page.to_string()),
        ];
        let response = self
            .get_with_params(&format!("/orgs/{}/repos", org), &params)
            .await?;
        let repos: Vec<RawRepository> = response.json().await?;
        Ok(repos)
    }
}
