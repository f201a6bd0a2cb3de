//! Request-intercepting cache controller.
//!
//! Installed once per client runtime. Reacts to three events:
//! - `Install`  - open the current generation and store the static manifest
//! - `Activate` - delete every generation except the current one
//! - `Fetch`    - classify the request and answer it network-first or cache-first
//!
//! Only the install manifest and network-first responses are ever written.

use std::sync::{Arc, Mutex};

use reqwest::{Method, Url};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{MirrorError, Result};

use super::network::Network;
use super::request::{CachedResponse, FetchResponse, Request, RequestKey, ResponseSource};
use super::storage::{CacheStorage, Generation};

// ---------------------------------------------------------------------------
// Events and lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of the controller within one runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    New,
    Installing,
    Installed,
    Activating,
    Active,
}

/// Event delivered by the runtime.
#[derive(Debug, Clone)]
pub enum Event {
    Install,
    Activate,
    Fetch(Request),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Install => "install",
            Event::Activate => "activate",
            Event::Fetch(_) => "fetch",
        }
    }
}

/// Result of handling one event.
#[derive(Debug)]
pub enum EventOutcome {
    /// Manifest stored under these keys.
    Installed(Vec<RequestKey>),
    /// Stale generations that were deleted.
    Activated(Vec<String>),
    Fetch(Interception),
}

/// What the controller did with an intercepted request.
#[derive(Debug)]
pub enum Interception {
    /// Not handled; the runtime performs the request itself.
    PassThrough,
    Respond(FetchResponse),
}

/// Caching strategy chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PassThrough,
    NetworkFirst,
    CacheFirst,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct CacheController {
    generation: Generation,
    network: Arc<dyn Network>,
    origin: Url,
    upstream_domain: String,
    manifest: Vec<String>,
    lifecycle: Mutex<Lifecycle>,
}

impl CacheController {
    pub fn new(
        generation: Generation,
        network: Arc<dyn Network>,
        origin: Url,
        upstream_domain: impl Into<String>,
        manifest: Vec<String>,
    ) -> Self {
        Self {
            generation,
            network,
            origin,
            upstream_domain: upstream_domain.into(),
            manifest,
            lifecycle: Mutex::new(Lifecycle::New),
        }
    }

    /// Build a controller for the configured origin and generation name.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Result<Self> {
        let origin = Url::parse(&config.origin)
            .map_err(|e| MirrorError::Config(format!("invalid ORGMIRROR_ORIGIN '{}': {}", config.origin, e)))?;
        Ok(Self::new(
            Generation::new(config.cache_name.clone(), storage),
            network,
            origin,
            config.upstream_domain.clone(),
            config.manifest.clone(),
        ))
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_lifecycle(&self, next: Lifecycle) {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(|e| e.into_inner());
        debug!(from = ?*lifecycle, to = ?next, "cache controller lifecycle");
        *lifecycle = next;
    }

    /// Route an event to its handler.
    pub async fn dispatch(&self, event: Event) -> Result<EventOutcome> {
        debug!(event = event.kind(), "dispatching cache event");
        match event {
            Event::Install => self.install().await.map(EventOutcome::Installed),
            Event::Activate => self.activate().await.map(EventOutcome::Activated),
            Event::Fetch(request) => self.intercept(request).await.map(EventOutcome::Fetch),
        }
    }

    /// Fetch through the controller, going straight to the network when the
    /// request is not intercepted.
    pub async fn send(&self, request: Request) -> Result<FetchResponse> {
        match self.intercept(request.clone()).await? {
            Interception::Respond(response) => Ok(response),
            Interception::PassThrough => Ok(FetchResponse {
                response: self.network.fetch(&request).await?,
                source: ResponseSource::Network,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Install
    // -----------------------------------------------------------------------

    /// Store every manifest entry, or none of them.
    #[instrument(skip(self), fields(generation = %self.generation.name()))]
    pub async fn install(&self) -> Result<Vec<RequestKey>> {
        self.set_lifecycle(Lifecycle::Installing);

        match self.populate_manifest().await {
            Ok(keys) => {
                self.set_lifecycle(Lifecycle::Installed);
                info!(entries = keys.len(), "cache generation installed");
                Ok(keys)
            }
            Err(e) => {
                // Back to New so the runtime can retry the install.
                self.set_lifecycle(Lifecycle::New);
                warn!(error = %e, "cache install failed");
                Err(e)
            }
        }
    }

    async fn populate_manifest(&self) -> Result<Vec<RequestKey>> {
        self.generation.open().await.map_err(|e| MirrorError::CachePopulation {
            url: self.generation.name().to_string(),
            reason: e.to_string(),
        })?;

        let mut entries: Vec<(RequestKey, CachedResponse)> = Vec::with_capacity(self.manifest.len());
        for path in &self.manifest {
            let url = self.origin.join(path).map_err(|e| MirrorError::CachePopulation {
                url: path.clone(),
                reason: e.to_string(),
            })?;
            let request = Request::get(url);
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| MirrorError::CachePopulation {
                    url: request.url.to_string(),
                    reason: e.to_string(),
                })?;
            if !response.is_ok() {
                return Err(MirrorError::CachePopulation {
                    url: request.url.to_string(),
                    reason: format!("HTTP {}", response.status),
                });
            }
            entries.push((request.key(), response));
        }

        self.generation
            .put_all(&entries)
            .await
            .map_err(|e| MirrorError::CachePopulation {
                url: self.generation.name().to_string(),
                reason: e.to_string(),
            })?;

        Ok(entries.into_iter().map(|(key, _)| key).collect())
    }

    // -----------------------------------------------------------------------
    // Activate
    // -----------------------------------------------------------------------

    /// Delete every generation other than the current one.
    ///
    /// A stale generation that cannot be listed or deleted is logged and left
    /// behind; only failing to open the current generation fails activation.
    #[instrument(skip(self), fields(generation = %self.generation.name()))]
    pub async fn activate(&self) -> Result<Vec<String>> {
        let previous = self.lifecycle();
        self.set_lifecycle(Lifecycle::Activating);

        if let Err(e) = self.generation.open().await {
            warn!(error = %e, "cache activation failed");
            self.set_lifecycle(previous);
            return Err(e);
        }

        let storage = self.generation.storage();
        let names = storage.names().await.unwrap_or_else(|e| {
            warn!(error = %e, "could not list cache generations");
            Vec::new()
        });

        let mut purged = Vec::new();
        for name in names {
            if name == self.generation.name() {
                continue;
            }
            match storage.delete(&name).await {
                Ok(true) => {
                    info!(stale = %name, "deleted stale cache generation");
                    purged.push(name);
                }
                Ok(false) => {}
                Err(e) => warn!(stale = %name, error = %e, "failed to delete stale cache generation"),
            }
        }

        self.set_lifecycle(Lifecycle::Active);
        Ok(purged)
    }

    // -----------------------------------------------------------------------
    // Fetch
    // -----------------------------------------------------------------------

    /// Choose how a request is handled.
    pub fn classify(&self, url: &Url) -> Strategy {
        if url.origin() != self.origin.origin() {
            return Strategy::PassThrough;
        }
        let upstream_host = url
            .host_str()
            .is_some_and(|host| host.contains(&self.upstream_domain));
        if url.path().contains("/api/") || upstream_host {
            Strategy::NetworkFirst
        } else {
            Strategy::CacheFirst
        }
    }

    async fn intercept(&self, request: Request) -> Result<Interception> {
        // Only an active controller intercepts.
        if self.lifecycle() != Lifecycle::Active {
            debug!(url = %request.url, "controller not active, passing through");
            return Ok(Interception::PassThrough);
        }

        let strategy = self.classify(&request.url);
        debug!(url = %request.url, ?strategy, "classified request");
        match strategy {
            Strategy::PassThrough => Ok(Interception::PassThrough),
            Strategy::NetworkFirst => self.network_first(request).await.map(Interception::Respond),
            Strategy::CacheFirst => self.cache_first(request).await.map(Interception::Respond),
        }
    }

    /// Network result when there is one (stored for later), cached entry otherwise.
    async fn network_first(&self, request: Request) -> Result<FetchResponse> {
        let key = request.key();
        match self.network.fetch(&request).await {
            Ok(response) => {
                if request.method == Method::GET {
                    if let Err(e) = self.generation.put(&key, &response).await {
                        warn!(key = %key, error = %e, "failed to store network response");
                    }
                } else {
                    debug!(key = %key, "not storing non-GET response");
                }
                Ok(FetchResponse {
                    response,
                    source: ResponseSource::Network,
                })
            }
            Err(network_error) => match self.lookup(&request, &key).await {
                Some(response) => {
                    if !response.is_fresh() {
                        debug!(key = %key, "serving stale cached entry while offline");
                    }
                    info!(key = %key, "network failed, serving cached entry");
                    Ok(FetchResponse {
                        response,
                        source: ResponseSource::Cache,
                    })
                }
                None => Err(network_error),
            },
        }
    }

    /// Cached entry when there is one, network otherwise. Never writes.
    async fn cache_first(&self, request: Request) -> Result<FetchResponse> {
        let key = request.key();
        if let Some(response) = self.lookup(&request, &key).await {
            debug!(key = %key, "cache hit");
            return Ok(FetchResponse {
                response,
                source: ResponseSource::Cache,
            });
        }

        debug!(key = %key, "cache miss");
        let response = self.network.fetch(&request).await?;
        Ok(FetchResponse {
            response,
            source: ResponseSource::Network,
        })
    }

    /// Store errors are logged and treated as a miss.
    async fn lookup(&self, request: &Request, key: &RequestKey) -> Option<CachedResponse> {
        if request.method != Method::GET {
            return None;
        }
        match self.generation.lookup(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key = %key, error = %e, "cache lookup failed");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::cache::disk::DiskStorage;
    use crate::cache::memory::MemoryStorage;

    const ORIGIN: &str = "http://localhost:3000";

    /// Network double serving canned bodies by URL.
    struct FakeNetwork {
        online: AtomicBool,
        routes: Mutex<HashMap<String, (u16, String)>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeNetwork {
        fn new() -> Self {
            let mut routes = HashMap::new();
            for path in ["/", "/manifest.json", "/icons/icon-192x192.png", "/icons/icon-512x512.png"] {
                routes.insert(format!("{}{}", ORIGIN, path), (200, format!("static {}", path)));
            }
            Self {
                online: AtomicBool::new(true),
                routes: Mutex::new(routes),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn route(&self, url: &str, status: u16, body: &str) {
            self.routes
                .lock()
                .unwrap()
                .insert(url.to_string(), (status, body.to_string()));
        }

        fn set_online(&self, online: bool) {
            self.online.store(online, Ordering::SeqCst);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn reset_calls(&self) {
            self.calls.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Network for FakeNetwork {
        async fn fetch(&self, request: &Request) -> Result<CachedResponse> {
            self.calls.lock().unwrap().push(request.url.to_string());
            if !self.online.load(Ordering::SeqCst) {
                return Err(MirrorError::Network("offline".to_string()));
            }
            let (status, body) = self
                .routes
                .lock()
                .unwrap()
                .get(request.url.as_str())
                .cloned()
                .unwrap_or((404, "not found".to_string()));
            Ok(CachedResponse::new(status, Vec::new(), body.into_bytes()))
        }
    }

    fn controller_with<S: CacheStorage + 'static>(
        name: &str,
        storage: Arc<S>,
        network: Arc<FakeNetwork>,
    ) -> CacheController {
        let config = Config {
            origin: ORIGIN.to_string(),
            cache_name: name.to_string(),
            ..Config::default()
        };
        CacheController::from_config(&config, storage, network).unwrap()
    }

    async fn active(name: &str) -> (CacheController, Arc<MemoryStorage>, Arc<FakeNetwork>) {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        let controller = controller_with(name, Arc::clone(&storage), Arc::clone(&network));
        controller.dispatch(Event::Install).await.unwrap();
        controller.dispatch(Event::Activate).await.unwrap();
        network.reset_calls();
        (controller, storage, network)
    }

    fn request(path: &str) -> Request {
        Request::parse(&format!("{}{}", ORIGIN, path)).unwrap()
    }

    async fn fetch(controller: &CacheController, request: Request) -> Result<Interception> {
        match controller.dispatch(Event::Fetch(request)).await? {
            EventOutcome::Fetch(interception) => Ok(interception),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn responded(interception: Interception) -> FetchResponse {
        match interception {
            Interception::Respond(response) => response,
            Interception::PassThrough => panic!("expected a response"),
        }
    }

    #[test]
    fn test_classify() {
        let storage = Arc::new(MemoryStorage::new());
        let controller = controller_with("v1", storage, Arc::new(FakeNetwork::new()));
        let url = |s: &str| Url::parse(s).unwrap();

        assert_eq!(controller.classify(&url("https://api.github.com/orgs/acme")), Strategy::PassThrough);
        assert_eq!(controller.classify(&url("http://localhost:4000/api/data")), Strategy::PassThrough);
        assert_eq!(controller.classify(&url("http://localhost:3000/api/data?type=org")), Strategy::NetworkFirst);
        assert_eq!(controller.classify(&url("http://localhost:3000/manifest.json")), Strategy::CacheFirst);
        assert_eq!(controller.classify(&url("http://localhost:3000/apis")), Strategy::CacheFirst);
    }

    #[test]
    fn test_classify_upstream_domain_on_same_origin() {
        let storage = Arc::new(MemoryStorage::new());
        let controller = CacheController::new(
            Generation::new("v1", storage),
            Arc::new(FakeNetwork::new()),
            Url::parse("https://mirror.github.com").unwrap(),
            "github.com",
            vec!["/".to_string()],
        );
        let url = Url::parse("https://mirror.github.com/logo.png").unwrap();
        assert_eq!(controller.classify(&url), Strategy::NetworkFirst);
    }

    #[tokio::test]
    async fn test_install_stores_manifest() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        let controller = controller_with("v1", Arc::clone(&storage), network);

        let keys = controller.install().await.unwrap();
        assert_eq!(keys.len(), 4);
        assert_eq!(controller.lifecycle(), Lifecycle::Installed);
        assert_eq!(storage.keys("v1").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        network.route(&format!("{}/icons/icon-512x512.png", ORIGIN), 404, "missing");
        let controller = controller_with("v1", Arc::clone(&storage), network);

        let result = controller.dispatch(Event::Install).await;
        assert!(matches!(result, Err(MirrorError::CachePopulation { .. })));
        assert!(storage.keys("v1").await.unwrap().is_empty());
        assert_eq!(controller.lifecycle(), Lifecycle::New);
    }

    #[tokio::test]
    async fn test_install_fails_when_offline() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        network.set_online(false);
        let controller = controller_with("v1", Arc::clone(&storage), network);

        assert!(matches!(
            controller.install().await,
            Err(MirrorError::CachePopulation { .. })
        ));
        assert!(storage.keys("v1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_install_keeps_key_set() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        let controller = controller_with("v1", Arc::clone(&storage), network);

        controller.install().await.unwrap();
        let first = storage.keys("v1").await.unwrap();
        controller.install().await.unwrap();
        assert_eq!(storage.keys("v1").await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_activate_purges_stale_generations() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());

        let old = controller_with("v1", Arc::clone(&storage), Arc::clone(&network));
        old.install().await.unwrap();
        old.activate().await.unwrap();
        network.route(&format!("{}/api/data?type=org", ORIGIN), 200, "v1 org");
        old.send(request("/api/data?type=org")).await.unwrap();

        let new = controller_with("v2", Arc::clone(&storage), Arc::clone(&network));
        new.install().await.unwrap();

        // Transition window: old entries still reachable.
        network.set_online(false);
        let before = new.generation().lookup(&request("/api/data?type=org").key()).await.unwrap();
        assert_eq!(before.unwrap().text(), "v1 org");

        let purged = new.activate().await.unwrap();
        assert_eq!(purged, vec!["v1"]);
        assert_eq!(storage.names().await.unwrap(), vec!["v2"]);

        let api_key = request("/api/data?type=org").key();
        assert!(storage.get("v1", &api_key).await.unwrap().is_none());
        assert!(new.generation().lookup(&api_key).await.unwrap().is_none());
        assert!(new.generation().lookup(&request("/").key()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_inactive_controller_passes_through() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        let controller = controller_with("v1", storage, Arc::clone(&network));
        controller.install().await.unwrap();

        let interception = fetch(&controller, request("/manifest.json")).await.unwrap();
        assert!(matches!(interception, Interception::PassThrough));
    }

    #[tokio::test]
    async fn test_cross_origin_passes_through_untouched() {
        let (controller, storage, network) = active("v1").await;
        let before = storage.keys("v1").await.unwrap();

        let external = Request::parse("https://api.github.com/orgs/acme").unwrap();
        let interception = fetch(&controller, external).await.unwrap();

        assert!(matches!(interception, Interception::PassThrough));
        assert!(network.calls().is_empty());
        assert_eq!(storage.keys("v1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_network_first_stores_and_serves_offline() {
        let (controller, storage, network) = active("v1").await;
        let url = format!("{}/api/data?type=repos", ORIGIN);
        network.route(&url, 200, r#"{"repos":[],"totalCount":0}"#);

        let live = responded(fetch(&controller, request("/api/data?type=repos")).await.unwrap());
        assert_eq!(live.source, ResponseSource::Network);

        let stored = storage.get("v1", &request("/api/data?type=repos").key()).await.unwrap();
        assert_eq!(stored.as_ref(), Some(&live.response));

        network.set_online(false);
        let offline = responded(fetch(&controller, request("/api/data?type=repos")).await.unwrap());
        assert_eq!(offline.source, ResponseSource::Cache);
        assert!(offline.is_offline());
        assert_eq!(offline.response, live.response);
    }

    #[tokio::test]
    async fn test_network_first_overwrites_previous_entry() {
        let (controller, storage, network) = active("v1").await;
        let url = format!("{}/api/data?type=org", ORIGIN);

        network.route(&url, 200, "first");
        controller.send(request("/api/data?type=org")).await.unwrap();
        network.route(&url, 200, "second");
        controller.send(request("/api/data?type=org")).await.unwrap();

        let stored = storage.get("v1", &request("/api/data?type=org").key()).await.unwrap();
        assert_eq!(stored.unwrap().text(), "second");
    }

    #[tokio::test]
    async fn test_network_first_caches_error_statuses_too() {
        let (controller, storage, _network) = active("v1").await;

        let live = controller.send(request("/api/data?type=bogus")).await.unwrap();
        assert_eq!(live.response.status, 404);
        assert!(storage.get("v1", &request("/api/data?type=bogus").key()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_network_first_offline_without_entry_fails() {
        let (controller, _storage, network) = active("v1").await;
        network.set_online(false);

        let result = fetch(&controller, request("/api/data?type=org")).await;
        assert!(matches!(result, Err(MirrorError::Network(_))));
    }

    #[tokio::test]
    async fn test_network_first_does_not_store_non_get() {
        let (controller, storage, _network) = active("v1").await;
        let mut post = request("/api/data?type=org");
        post.method = Method::POST;

        controller.send(post.clone()).await.unwrap();
        assert!(storage.get("v1", &post.key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_first_hit_skips_network() {
        let (controller, _storage, network) = active("v1").await;

        let hit = responded(fetch(&controller, request("/manifest.json")).await.unwrap());
        assert_eq!(hit.source, ResponseSource::Cache);
        assert_eq!(hit.response.text(), "static /manifest.json");
        assert!(network.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cache_first_miss_fetches_without_storing() {
        let (controller, storage, network) = active("v1").await;
        let url = format!("{}/logo.png", ORIGIN);
        network.route(&url, 200, "png");

        let miss = responded(fetch(&controller, request("/logo.png")).await.unwrap());
        assert_eq!(miss.source, ResponseSource::Network);
        assert_eq!(network.calls(), vec![url]);
        assert!(storage.get("v1", &request("/logo.png").key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_first_miss_offline_fails() {
        let (controller, _storage, network) = active("v1").await;
        network.set_online(false);

        let result = controller.send(request("/logo.png")).await;
        assert!(matches!(result, Err(MirrorError::Network(_))));
    }

    #[tokio::test]
    async fn test_concurrent_fetches_are_independent() {
        let (controller, storage, network) = active("v1").await;
        network.route(&format!("{}/api/data?type=org", ORIGIN), 200, "org");
        network.route(&format!("{}/api/data?type=repos", ORIGIN), 200, "repos");

        let (org, repos, root) = tokio::join!(
            controller.send(request("/api/data?type=org")),
            controller.send(request("/api/data?type=repos")),
            controller.send(request("/")),
        );
        assert_eq!(org.unwrap().response.text(), "org");
        assert_eq!(repos.unwrap().response.text(), "repos");
        assert_eq!(root.unwrap().source, ResponseSource::Cache);
        assert_eq!(storage.keys("v1").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_disk_backed_lifecycle_survives_foreign_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = Arc::new(DiskStorage::new(temp_dir.path()));
        let network = Arc::new(FakeNetwork::new());

        let old = controller_with("v1", Arc::clone(&storage), Arc::clone(&network));
        old.install().await.unwrap();
        std::fs::create_dir(temp_dir.path().join(".trash")).unwrap();

        let new = controller_with("v2", Arc::clone(&storage), Arc::clone(&network));
        new.install().await.unwrap();
        let purged = new.activate().await.unwrap();

        assert_eq!(purged, vec!["v1"]);
        assert_eq!(new.lifecycle(), Lifecycle::Active);
        assert_eq!(storage.names().await.unwrap(), vec!["v2"]);

        network.set_online(false);
        let hit = responded(fetch(&new, request("/manifest.json")).await.unwrap());
        assert_eq!(hit.source, ResponseSource::Cache);
        assert_eq!(hit.response.text(), "static /manifest.json");
    }
}
