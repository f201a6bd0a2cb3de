// Runtime configuration.
// Loaded once from environment variables at startup.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{MirrorError, Result};

pub const DEFAULT_ORG: &str = "boringcode-dev";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_CACHE_NAME: &str = "orgmirror-v1";
pub const DEFAULT_AVATAR_OVERRIDE: &str = "/logo.png";

/// How the proxy endpoint reacts to upstream failures.
///
/// One mode applies to the whole deployment; it is never switched per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Answer 200 with a static placeholder payload.
    #[default]
    Fallback,
    /// Answer 500 with the error message.
    Strict,
}

impl FromStr for FailureMode {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(FailureMode::Fallback),
            "strict" => Ok(FailureMode::Strict),
            other => Err(MirrorError::Config(format!(
                "ORGMIRROR_FAILURE_MODE must be 'fallback' or 'strict', got '{}'",
                other
            ))),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization mirrored by the proxy.
    pub org: String,
    /// Optional upstream credential, only raises rate limits.
    pub token: Option<String>,
    /// Upstream API base URL.
    pub api_base: String,
    pub host: String,
    pub port: u16,
    pub failure_mode: FailureMode,
    /// Local asset that replaces the upstream avatar URL, if set.
    pub avatar_override: Option<String>,
    /// Name of the current cache generation.
    pub cache_name: String,
    /// Origin the cache controller considers "same-origin".
    pub origin: String,
    /// Host substring that routes a request to network-first.
    pub upstream_domain: String,
    /// Resources stored at install time.
    pub manifest: Vec<String>,
    /// Directory whose files are served next to the data endpoint.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            failure_mode: FailureMode::default(),
            avatar_override: Some(DEFAULT_AVATAR_OVERRIDE.to_string()),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            origin: "http://127.0.0.1:3000".to_string(),
            upstream_domain: "github.com".to_string(),
            manifest: default_manifest(),
            static_dir: None,
        }
    }
}

/// Critical static resources cached on install.
pub fn default_manifest() -> Vec<String> {
    ["/", "/manifest.json", "/icons/icon-192x192.png", "/icons/icon-512x512.png"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("ORGMIRROR_PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| MirrorError::Config(format!("invalid ORGMIRROR_PORT '{}'", v)))?,
            Err(_) => defaults.port,
        };

        let failure_mode = match env::var("ORGMIRROR_FAILURE_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.failure_mode,
        };

        // An explicitly empty value turns the override off.
        let avatar_override = match env::var("ORGMIRROR_AVATAR_OVERRIDE") {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(v),
            Err(_) => defaults.avatar_override,
        };

        let manifest = match env::var("ORGMIRROR_MANIFEST") {
            Ok(v) => parse_manifest(&v)?,
            Err(_) => defaults.manifest,
        };

        let host = env::var("ORGMIRROR_HOST").unwrap_or(defaults.host);
        let origin = env::var("ORGMIRROR_ORIGIN").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Ok(Self {
            org: env::var("ORGMIRROR_ORG").unwrap_or(defaults.org),
            token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            api_base: env::var("ORGMIRROR_API_BASE").unwrap_or(defaults.api_base),
            host,
            port,
            failure_mode,
            avatar_override,
            cache_name: env::var("ORGMIRROR_CACHE_NAME").unwrap_or(defaults.cache_name),
            origin,
            upstream_domain: env::var("ORGMIRROR_UPSTREAM_DOMAIN").unwrap_or(defaults.upstream_domain),
            manifest,
            static_dir: env::var("ORGMIRROR_STATIC_DIR")
                .ok()
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Socket address the proxy listens on.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a comma-separated manifest. The root document is always included.
fn parse_manifest(raw: &str) -> Result<Vec<String>> {
    let mut entries: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(bad) = entries.iter().find(|e| !e.starts_with('/')) {
        return Err(MirrorError::Config(format!(
            "manifest entry '{}' must be an absolute path",
            bad
        )));
    }

    if !entries.iter().any(|e| e == "/") {
        entries.insert(0, "/".to_string());
    }
    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.clone()));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_mode_parse() {
        assert_eq!("fallback".parse::<FailureMode>().unwrap(), FailureMode::Fallback);
        assert_eq!(" STRICT ".parse::<FailureMode>().unwrap(), FailureMode::Strict);
        assert!("lenient".parse::<FailureMode>().is_err());
    }

    #[test]
    fn test_manifest_always_has_root() {
        let manifest = parse_manifest("/manifest.json, /icons/a.png").unwrap();
        assert_eq!(manifest, vec!["/", "/manifest.json", "/icons/a.png"]);

        let manifest = parse_manifest("/,/manifest.json").unwrap();
        assert_eq!(manifest, vec!["/", "/manifest.json"]);
    }

    #[test]
    fn test_manifest_drops_repeated_entries() {
        let manifest = parse_manifest("/a,/b,/a, /b").unwrap();
        assert_eq!(manifest, vec!["/", "/a", "/b"]);
    }

    #[test]
    fn test_manifest_rejects_relative_paths() {
        assert!(matches!(
            parse_manifest("/, icons/a.png"),
            Err(MirrorError::Config(_))
        ));
    }

    #[test]
    fn test_default_manifest() {
        let config = Config::default();
        assert_eq!(config.manifest.len(), 4);
        assert_eq!(config.manifest[0], "/");
        assert_eq!(config.failure_mode, FailureMode::Fallback);
    }
}
