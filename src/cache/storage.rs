// Cache storage abstraction.
// Named generations of request -> response entries, plus the handle to one generation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

use super::request::{CachedResponse, RequestKey};

/// Store holding any number of named cache generations.
///
/// Implementations must make `put` and `get` atomic per key; `put_all`
/// must store either every entry or none.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the generation if it does not exist yet.
    async fn open(&self, name: &str) -> Result<()>;

    /// Names of all existing generations, oldest first.
    async fn names(&self) -> Result<Vec<String>>;

    /// Delete a generation and all its entries. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool>;

    async fn get(&self, name: &str, key: &RequestKey) -> Result<Option<CachedResponse>>;

    /// Store a response, replacing any entry under the same key.
    async fn put(&self, name: &str, key: &RequestKey, response: &CachedResponse) -> Result<()>;

    async fn put_all(&self, name: &str, entries: &[(RequestKey, CachedResponse)]) -> Result<()>;

    /// Keys stored in a generation, sorted.
    async fn keys(&self, name: &str) -> Result<Vec<RequestKey>>;

    /// First match across every generation, oldest first.
    async fn match_any(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        for name in self.names().await? {
            if let Some(response) = self.get(&name, key).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

/// Handle to the current cache generation.
#[derive(Clone)]
pub struct Generation {
    name: String,
    storage: Arc<dyn CacheStorage>,
}

impl Generation {
    pub fn new(name: impl Into<String>, storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            name: name.into(),
            storage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub async fn open(&self) -> Result<()> {
        self.storage.open(&self.name).await
    }

    pub async fn get(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        self.storage.get(&self.name, key).await
    }

    pub async fn put(&self, key: &RequestKey, response: &CachedResponse) -> Result<()> {
        self.storage.put(&self.name, key, response).await
    }

    pub async fn put_all(&self, entries: &[(RequestKey, CachedResponse)]) -> Result<()> {
        self.storage.put_all(&self.name, entries).await
    }

    pub async fn keys(&self) -> Result<Vec<RequestKey>> {
        self.storage.keys(&self.name).await
    }

    /// Look in this generation first, then in any other still present.
    pub async fn lookup(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        if let Some(response) = self.get(key).await? {
            return Ok(Some(response));
        }
        self.storage.match_any(key).await
    }
}
