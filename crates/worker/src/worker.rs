//! The worker: per-request interception and the caching strategies.

use std::sync::Arc;

use tokio::sync::RwLock;
use url::Url;

use awning_core::{AppConfig, CachedResponse, Error, Method, PartitionRegistry, Request, StoreDb, Transport};

use crate::clients::ClientHub;
use crate::phase::Phase;
use crate::router::{self, Route};
use crate::tasks::TaskTracker;

/// Outcome of intercepting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDecision {
    /// Not intercepted; the platform performs the request untouched.
    Bypass,
    /// The worker produced the response (cached, fetched, or synthetic).
    Respond(CachedResponse),
}

/// One logical worker instance for an application origin.
pub struct Worker {
    config: AppConfig,
    registry: PartitionRegistry,
    store: StoreDb,
    transport: Arc<dyn Transport>,
    phase: RwLock<Phase>,
    tracker: TaskTracker,
    hub: ClientHub,
    pub(crate) origin: Url,
    origin_host: String,
    fallback_url: Url,
}

impl Worker {
    /// Build a worker. Starts in [`Phase::Installing`]; the host is expected
    /// to drive `install()` and `activate()` before serving.
    pub fn new(config: AppConfig, store: StoreDb, transport: Arc<dyn Transport>) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
        let origin_host = origin
            .host_str()
            .ok_or_else(|| Error::InvalidUrl("origin must have a host".to_string()))?
            .to_string();
        let fallback_url = origin
            .join(&config.offline_fallback)
            .map_err(|e| Error::InvalidUrl(format!("offline_fallback: {e}")))?;
        let registry = PartitionRegistry::from_config(&config);

        Ok(Self {
            config,
            registry,
            store,
            transport,
            phase: RwLock::new(Phase::Installing),
            tracker: TaskTracker::new(),
            hub: ClientHub::new(),
            origin,
            origin_host,
            fallback_url,
        })
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub fn registry(&self) -> &PartitionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &StoreDb {
        &self.store
    }

    pub fn clients(&self) -> &ClientHub {
        &self.hub
    }

    pub(crate) fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Await all background work spawned so far (cache writes, refreshes).
    pub async fn settle_background(&self) {
        self.tracker.settle().await;
    }

    /// Advance the lifecycle phase, rejecting out-of-order transitions.
    pub(crate) async fn advance(&self, next: Phase) -> Result<(), Error> {
        let mut phase = self.phase.write().await;
        if !phase.can_advance_to(next) {
            return Err(Error::Lifecycle { from: phase.to_string(), to: next.to_string() });
        }
        tracing::debug!("lifecycle: {} -> {}", *phase, next);
        *phase = next;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn set_phase_for_tests(&self, phase: Phase) {
        *self.phase.write().await = phase;
    }

    /// Intercept one outgoing request.
    ///
    /// Every failure path terminates in a concrete response: the caller
    /// never sees an interception-level error.
    pub async fn handle_fetch(&self, request: &Request) -> FetchDecision {
        if self.phase().await != Phase::Active {
            return FetchDecision::Bypass;
        }

        match router::classify(request, &self.origin_host, &self.config.live_hosts) {
            Route::Bypass => FetchDecision::Bypass,
            Route::LiveData => FetchDecision::Respond(self.network_first(request).await),
            Route::External => FetchDecision::Respond(self.stale_while_revalidate(request).await),
            Route::Static => FetchDecision::Respond(self.cache_first(request).await),
        }
    }

    /// Cache-first with fallback, for the application's own shell assets.
    ///
    /// A hit is returned unchanged — no revalidation, since local asset
    /// versions are tied to the partition's version tag. A miss goes to the
    /// network and is cached on success. When the network also fails,
    /// navigation requests get the cached root document; everything else
    /// gets the 503 "Offline" body.
    async fn cache_first(&self, request: &Request) -> CachedResponse {
        let partition = self.registry.static_name();

        if let Some(hit) = self.lookup(partition, request).await {
            return hit;
        }

        match self.transport.fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    self.store_in_background(partition, request, &response).await;
                }
                response
            }
            Err(e) => {
                tracing::warn!("fetch of {} failed: {e}", request.url);
                if request.is_navigation {
                    if let Some(root) = self.lookup_url(partition, self.fallback_url.as_str()).await {
                        return root;
                    }
                }
                CachedResponse::offline_text()
            }
        }
    }

    /// Stale-while-revalidate, for third-party assets.
    ///
    /// A hit is returned immediately while a refresh runs in the
    /// background; a successful refresh overwrites the entry, any refresh
    /// failure is silently ignored.
    async fn stale_while_revalidate(&self, request: &Request) -> CachedResponse {
        let partition = self.registry.external_name();

        if let Some(hit) = self.lookup(partition, request).await {
            let store = self.store.clone();
            let transport = Arc::clone(&self.transport);
            let partition = partition.to_string();
            let request = request.clone();
            self.tracker
                .spawn(async move {
                    match transport.fetch(&request).await {
                        Ok(fresh) if fresh.ok() => {
                            if let Err(e) = store.put_entry(&partition, &request, &fresh).await {
                                tracing::debug!("refresh write for {} failed: {e}", request.url);
                            }
                        }
                        Ok(fresh) => {
                            tracing::debug!("refresh of {} returned {}", request.url, fresh.status);
                        }
                        Err(e) => {
                            tracing::debug!("refresh of {} failed: {e}", request.url);
                        }
                    }
                })
                .await;
            return hit;
        }

        match self.transport.fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    self.store_in_background(partition, request, &response).await;
                }
                response
            }
            Err(e) => {
                tracing::warn!("external fetch of {} failed: {e}", request.url);
                CachedResponse::offline_empty()
            }
        }
    }

    /// Network-first for live-data endpoints: never cached, and a transport
    /// failure turns into the `{"offline":true}` marker so the caller
    /// degrades instead of erroring.
    async fn network_first(&self, request: &Request) -> CachedResponse {
        match self.transport.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("live fetch of {} failed, serving offline marker: {e}", request.url);
                CachedResponse::offline_json()
            }
        }
    }

    /// Best-effort cache read; store errors degrade to a miss.
    async fn lookup(&self, partition: &str, request: &Request) -> Option<CachedResponse> {
        match self.store.match_entry(partition, request).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("cache lookup for {} failed: {e}", request.url);
                None
            }
        }
    }

    async fn lookup_url(&self, partition: &str, url: &str) -> Option<CachedResponse> {
        match self.store.match_url(partition, Method::Get, url).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("cache lookup for {url} failed: {e}");
                None
            }
        }
    }

    /// Best-effort cache write, tracked but never awaited by the caller.
    async fn store_in_background(&self, partition: &str, request: &Request, response: &CachedResponse) {
        let store = self.store.clone();
        let partition = partition.to_string();
        let request = request.clone();
        let response = response.clone();
        self.tracker
            .spawn(async move {
                if let Err(e) = store.put_entry(&partition, &request, &response).await {
                    tracing::warn!("cache write for {} failed: {e}", request.url);
                }
            })
            .await;
    }
}
