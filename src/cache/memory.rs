// In-memory cache storage.
// Generations live for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

use super::request::{CachedResponse, RequestKey};
use super::storage::CacheStorage;

type Entries = HashMap<RequestKey, CachedResponse>;

/// Cache storage backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Generations in creation order.
    generations: RwLock<Vec<(String, Entries)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn find<'a>(generations: &'a mut Vec<(String, Entries)>, name: &str) -> &'a mut Entries {
    let index = match generations.iter().position(|(n, _)| n == name) {
        Some(index) => index,
        None => {
            generations.push((name.to_string(), Entries::new()));
            generations.len() - 1
        }
    };
    &mut generations[index].1
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<()> {
        let mut generations = self.generations.write().await;
        find(&mut generations, name);
        Ok(())
    }

    async fn names(&self) -> Result<Vec<String>> {
        let generations = self.generations.read().await;
        Ok(generations.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut generations = self.generations.write().await;
        let before = generations.len();
        generations.retain(|(n, _)| n != name);
        Ok(generations.len() != before)
    }

    async fn get(&self, name: &str, key: &RequestKey) -> Result<Option<CachedResponse>> {
        let generations = self.generations.read().await;
        Ok(generations
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, entries)| entries.get(key))
            .cloned())
    }

    async fn put(&self, name: &str, key: &RequestKey, response: &CachedResponse) -> Result<()> {
        let mut generations = self.generations.write().await;
        find(&mut generations, name).insert(key.clone(), response.clone());
        Ok(())
    }

    async fn put_all(&self, name: &str, entries: &[(RequestKey, CachedResponse)]) -> Result<()> {
        let mut generations = self.generations.write().await;
        let target = find(&mut generations, name);
        for (key, response) in entries {
            target.insert(key.clone(), response.clone());
        }
        Ok(())
    }

    async fn keys(&self, name: &str) -> Result<Vec<RequestKey>> {
        let generations = self.generations.read().await;
        let mut keys: Vec<RequestKey> = generations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
