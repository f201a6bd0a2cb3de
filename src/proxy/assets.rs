// Static assets served next to the data endpoint.
// Files come from the configured static directory; the page shell, its web
// manifest and the icons have built-in defaults so the install manifest is
// always reachable on this server.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::handler::ProxyState;

/// 1x1 transparent PNG used for icons nobody provided.
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Where static files are looked up.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    dir: Option<PathBuf>,
}

impl Assets {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Bytes and content type for a request path, or None when nothing matches.
    pub async fn load(&self, org: &str, request_path: &str) -> Option<(Vec<u8>, &'static str)> {
        let relative = relative_path(request_path)?;

        if let Some(dir) = &self.dir {
            match tokio::fs::read(dir.join(&relative)).await {
                Ok(bytes) => return Some((bytes, content_type(&relative))),
                Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::IsADirectory => {}
                Err(e) => {
                    warn!(path = %relative.display(), error = %e, "failed to read static asset");
                    return None;
                }
            }
        }

        builtin(org, &relative).map(|bytes| (bytes, content_type(&relative)))
    }
}

/// Map a URL path to a path under the static directory. `/` is the page shell.
/// Anything that could leave the directory is rejected.
fn relative_path(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(PathBuf::from("index.html"));
    }
    let path = PathBuf::from(trimmed);
    if path.components().all(|c| matches!(c, Component::Normal(_))) {
        Some(path)
    } else {
        None
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

fn builtin(org: &str, relative: &Path) -> Option<Vec<u8>> {
    match relative.to_str()? {
        "index.html" => Some(shell_page(org).into_bytes()),
        "manifest.json" => serde_json::to_vec_pretty(&web_manifest(org)).ok(),
        "icons/icon-192x192.png" | "icons/icon-512x512.png" | "logo.png" => Some(PLACEHOLDER_PNG.to_vec()),
        _ => None,
    }
}

fn shell_page(org: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{org}</title>
<link rel="manifest" href="/manifest.json">
<link rel="icon" href="/icons/icon-192x192.png">
</head>
<body>
<main id="org" data-source="/api/data?type=org"></main>
<section id="repos" data-source="/api/data?type=repos"></section>
</body>
</html>
"#
    )
}

fn web_manifest(org: &str) -> serde_json::Value {
    serde_json::json!({
        "name": org,
        "short_name": org,
        "start_url": "/",
        "display": "standalone",
        "icons": [
            { "src": "/icons/icon-192x192.png", "sizes": "192x192", "type": "image/png" },
            { "src": "/icons/icon-512x512.png", "sizes": "512x512", "type": "image/png" },
        ],
    })
}

/// Router fallback: any path not claimed by the data routes.
pub async fn handle_asset(State(state): State<Arc<ProxyState>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match state.assets.load(&state.org, uri.path()).await {
        Some((bytes, content_type)) => {
            let mut response = bytes.into_response();
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            response
        }
        None => {
            debug!(path = %uri.path(), "no static asset");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("/"), Some(PathBuf::from("index.html")));
        assert_eq!(
            relative_path("/icons/icon-192x192.png"),
            Some(PathBuf::from("icons/icon-192x192.png"))
        );
        assert_eq!(relative_path("/../etc/passwd"), None);
        assert_eq!(relative_path("/icons/./a.png"), Some(PathBuf::from("icons/a.png")));
    }

    #[tokio::test]
    async fn test_builtin_shell_and_manifest() {
        let assets = Assets::default();

        let (page, content_type) = assets.load("acme", "/").await.unwrap();
        assert_eq!(content_type, "text/html; charset=utf-8");
        assert!(String::from_utf8(page).unwrap().contains("<title>acme</title>"));

        let (manifest, content_type) = assets.load("acme", "/manifest.json").await.unwrap();
        assert_eq!(content_type, "application/json");
        let manifest: serde_json::Value = serde_json::from_slice(&manifest).unwrap();
        assert_eq!(manifest["icons"].as_array().unwrap().len(), 2);

        let (icon, _) = assets.load("acme", "/icons/icon-512x512.png").await.unwrap();
        assert!(icon.starts_with(b"\x89PNG"));

        assert!(assets.load("acme", "/missing.css").await.is_none());
    }

    #[tokio::test]
    async fn test_static_dir_overrides_builtin() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("index.html"), "<p>custom</p>").unwrap();
        std::fs::write(temp_dir.path().join("app.css"), "body {}").unwrap();
        let assets = Assets::new(Some(temp_dir.path().to_path_buf()));

        let (page, _) = assets.load("acme", "/").await.unwrap();
        assert_eq!(page, b"<p>custom</p>");
        let (css, content_type) = assets.load("acme", "/app.css").await.unwrap();
        assert_eq!(css, b"body {}");
        assert_eq!(content_type, "text/css; charset=utf-8");

        // Files the directory lacks still fall back to the defaults.
        assert!(assets.load("acme", "/manifest.json").await.is_some());
    }
}
