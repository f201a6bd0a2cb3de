// GitHub API HTTP client.
// Handles optional authentication, default headers, and status checking.

use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{MirrorError, Result};

use super::types::RateLimit;

const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = "orgmirror";

/// Stateless GitHub API client.
///
/// Cloning is cheap and clones share the underlying connection pool. No
/// retries are performed here.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base: String,
}

impl GitHubClient {
    /// Create a client, authenticating only when a token is given.
    pub fn new(base: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|e| MirrorError::Config(format!("invalid GITHUB_TOKEN: {}", e)))?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_V3));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(MirrorError::Http)?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.token.is_none() {
            debug!("no GITHUB_TOKEN configured, using anonymous rate limits");
        }
        Self::new(&config.api_base, config.token.as_deref())
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(MirrorError::Http)?;

        log_rate_limit(&response);
        check_response(response)
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        self.get_with_params(endpoint, &[] as &[(&str, &str)]).await
    }
}

/// Log rate limit headers without keeping any state.
fn log_rate_limit(response: &Response) {
    if let Some(rate) = RateLimit::from_headers(response.headers()) {
        if rate.remaining == 0 {
            warn!(limit = rate.limit, reset_at = %rate.reset_at(), "upstream rate limit exhausted");
        } else {
            debug!(limit = rate.limit, remaining = rate.remaining, "upstream rate limit");
        }
    }
}

/// Any non-2xx status becomes an upstream error carrying that status.
fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        debug!(status = status.as_u16(), url = %response.url(), "upstream request failed");
        Err(MirrorError::Upstream {
            status: status.as_u16(),
        })
    }
}
