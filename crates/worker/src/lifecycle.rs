//! Install and activation: populating partitions and purging stale ones.

use std::sync::Arc;

use tokio::task::JoinSet;
use url::Url;

use awning_core::{Error, Request};

use crate::phase::Phase;
use crate::worker::Worker;

impl Worker {
    /// Install: pre-cache the configured asset lists.
    ///
    /// Every asset fetch is an independent task; the install settles when
    /// all of them have finished, and individual failures are logged and
    /// swallowed — one broken link must not cost offline availability of
    /// the rest. Completion signals immediate readiness to replace any
    /// previous version: the phase becomes [`Phase::Waiting`] with no user
    /// confirmation step.
    pub async fn install(&self) -> Result<(), Error> {
        self.ensure_phase(Phase::Installing, Phase::Waiting).await?;

        let config = self.config();
        tracing::info!(
            "installing: pre-caching {} static and {} external assets",
            config.static_assets.len(),
            config.external_assets.len()
        );

        let mut jobs: Vec<(String, Request)> = Vec::new();
        for path in &config.static_assets {
            match self.origin.join(path) {
                Ok(url) => jobs.push((self.registry().static_name().to_string(), Request::get(url))),
                Err(e) => tracing::warn!("skipping unresolvable static asset {path:?}: {e}"),
            }
        }
        for raw in &config.external_assets {
            match Url::parse(raw) {
                Ok(url) => jobs.push((self.registry().external_name().to_string(), Request::get(url))),
                Err(e) => tracing::warn!("skipping invalid external asset {raw:?}: {e}"),
            }
        }

        let mut set = JoinSet::new();
        for (partition, request) in jobs {
            let store = self.store().clone();
            let transport = Arc::clone(self.transport());
            set.spawn(async move {
                match transport.fetch(&request).await {
                    Ok(response) if response.ok() => match store.put_entry(&partition, &request, &response).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!("failed to store pre-cached {}: {e}", request.url);
                            false
                        }
                    },
                    Ok(response) => {
                        tracing::warn!("pre-cache of {} returned status {}", request.url, response.status);
                        false
                    }
                    Err(e) => {
                        tracing::warn!("pre-cache of {} failed: {e}", request.url);
                        false
                    }
                }
            });
        }

        let mut attempted = 0usize;
        let mut cached = 0usize;
        while let Some(joined) = set.join_next().await {
            attempted += 1;
            if joined.unwrap_or(false) {
                cached += 1;
            }
        }
        tracing::info!("install complete: {cached}/{attempted} assets cached");

        self.advance(Phase::Waiting).await
    }

    /// Activate: purge partitions left over from previous versions, then
    /// take control of all connected clients without a reload.
    ///
    /// Deletion failures are logged and the sweep continues — a stale
    /// partition wastes storage but is never served from.
    pub async fn activate(&self) -> Result<(), Error> {
        self.ensure_phase(Phase::Waiting, Phase::Activating).await?;
        self.advance(Phase::Activating).await?;

        let names = match self.store().partition_names().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("cleanup enumeration failed: {e}");
                Vec::new()
            }
        };

        for name in names {
            if self.registry().is_retained(&name) {
                continue;
            }
            match self.store().delete_partition(&name).await {
                Ok(count) => tracing::info!("deleted stale partition {name} ({count} entries)"),
                Err(e) => tracing::warn!("failed to delete stale partition {name}: {e}"),
            }
        }

        self.clients().claim().await;
        self.advance(Phase::Active).await
    }

    async fn ensure_phase(&self, expected: Phase, next: Phase) -> Result<(), Error> {
        let phase = self.phase().await;
        if phase != expected {
            return Err(Error::Lifecycle { from: phase.to_string(), to: next.to_string() });
        }
        Ok(())
    }
}
