// Normalization of raw upstream payloads.
// Pure functions: filter, sort, and truncate the repository list.

use crate::github::{RawOrganization, RawRepository};

use super::model::{Organization, Repository, RepositoryList};

/// Maximum number of repositories returned to the page.
pub const MAX_REPOS: usize = 9;

/// Shape an organization payload into the served view.
pub fn normalize_org(raw: RawOrganization) -> Organization {
    Organization {
        // Fall back to the login when the org has no display name.
        name: raw.name.unwrap_or_else(|| raw.login.clone()),
        login: raw.login,
        description: raw.description,
        avatar_url: raw.avatar_url,
        html_url: raw.html_url,
        public_repo_count: raw.public_repos,
    }
}

/// Filter, sort by stars (stable), and truncate to [`MAX_REPOS`].
pub fn normalize_repos(raw: Vec<RawRepository>) -> RepositoryList {
    let mut repos: Vec<Repository> = raw
        .into_iter()
        .filter(|repo| is_listed(&repo.name))
        .map(normalize_repo)
        .collect();

    // sort_by is stable, so equal star counts keep upstream order.
    repos.sort_by(|a, b| b.star_count.cmp(&a.star_count));

    let total_count = repos.len();
    repos.truncate(MAX_REPOS);

    RepositoryList { repos, total_count }
}

/// Hide `.github` meta repositories and anything that looks like a test repo.
///
/// This is a deliberately blunt name heuristic: "latest-news" is hidden too.
pub fn is_listed(name: &str) -> bool {
    !name.contains(".github") && !name.to_lowercase().contains("test")
}

fn normalize_repo(raw: RawRepository) -> Repository {
    Repository {
        id: raw.id,
        name: raw.name,
        description: raw.description,
        html_url: raw.html_url,
        star_count: raw.stargazers_count,
        fork_count: raw.forks_count,
        primary_language: raw.language,
        topics: raw.topics,
        updated_at: raw.updated_at,
        pushed_at: raw.pushed_at,
    }
}
