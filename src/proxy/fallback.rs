// Static placeholder payloads served when the upstream is unavailable.

use crate::config::{DEFAULT_AVATAR_OVERRIDE, DEFAULT_ORG};
use crate::data::{Organization, RepositoryList};

/// Placeholder organization shown instead of an upstream failure.
///
/// The default organization carries its own branding; any other login is
/// shown under its own name without a description.
pub fn fallback_org(login: &str, avatar_override: Option<&str>) -> Organization {
    let (name, description) = if login == DEFAULT_ORG {
        (
            "BoringCode.dev".to_string(),
            Some("We write the boring stuff, so you don't have to.".to_string()),
        )
    } else {
        (login.to_string(), None)
    };
    Organization {
        login: login.to_string(),
        name,
        description,
        avatar_url: avatar_override.unwrap_or(DEFAULT_AVATAR_OVERRIDE).to_string(),
        html_url: format!("https://github.com/{}", login),
        public_repo_count: 0,
    }
}

/// Empty repository list with a zero total.
pub fn fallback_repos() -> RepositoryList {
    RepositoryList::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_org_links_to_login() {
        let org = fallback_org("acme", None);
        assert_eq!(org.html_url, "https://github.com/acme");
        assert_eq!(org.avatar_url, "/logo.png");
        assert_eq!(org.public_repo_count, 0);

        let org = fallback_org("acme", Some("/brand.svg"));
        assert_eq!(org.avatar_url, "/brand.svg");
    }

    #[test]
    fn test_fallback_org_branding_follows_login() {
        let org = fallback_org("acme", None);
        assert_eq!(org.name, "acme");
        assert!(org.description.is_none());

        let org = fallback_org(DEFAULT_ORG, None);
        assert_eq!(org.name, "BoringCode.dev");
        assert!(org.description.is_some());
    }

    #[test]
    fn test_fallback_repos_empty() {
        let repos = fallback_repos();
        assert!(repos.repos.is_empty());
        assert_eq!(repos.total_count, 0);
    }
}
