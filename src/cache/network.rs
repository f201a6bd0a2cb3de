// Network transport used by the cache controller.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{MirrorError, Result};

use super::request::{CachedResponse, Request};

/// Transport performing the real fetch.
///
/// Any HTTP response, whatever its status, is a success. Only the absence
/// of a response is an error, reported as [`MirrorError::Network`].
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse>;
}

/// [`Network`] over a reqwest client. Timeouts are reqwest's defaults.
#[derive(Debug, Clone, Default)]
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await
            .map_err(|e| MirrorError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| MirrorError::Network(e.to_string()))?;

        Ok(CachedResponse::new(status, headers, body.to_vec()))
    }
}
