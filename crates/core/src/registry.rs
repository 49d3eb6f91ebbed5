//! Versioned partition names and the activation-cleanup survivor set.
//!
//! Two partitions are "current" at any time: STATIC (locally-hosted shell
//! assets) and EXTERNAL (third-party assets). Their names embed the deploy
//! version, so bumping the version on redeploy creates fresh partitions and
//! leaves the old ones eligible for deletion during activation cleanup. A
//! small set of reserved legacy names is retained purely so cleanup does not
//! delete them.

use crate::config::AppConfig;

/// The fixed partition names for one deployed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRegistry {
    static_name: String,
    external_name: String,
    legacy: Vec<String>,
}

impl PartitionRegistry {
    pub fn new(prefix: &str, version: &str, legacy: Vec<String>) -> Self {
        Self {
            static_name: format!("{prefix}-static-{version}"),
            external_name: format!("{prefix}-external-{version}"),
            legacy,
        }
    }

    /// Build the registry from configuration.
    ///
    /// When no legacy names are configured, the pre-split combined cache
    /// name (`{prefix}-cache-{version}`) is retained, matching earlier
    /// deployments that used a single partition.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut legacy = config.legacy_caches.clone();
        if legacy.is_empty() {
            legacy.push(format!("{}-cache-{}", config.cache_prefix, config.cache_version));
        }
        Self::new(&config.cache_prefix, &config.cache_version, legacy)
    }

    /// Name of the current STATIC partition.
    pub fn static_name(&self) -> &str {
        &self.static_name
    }

    /// Name of the current EXTERNAL partition.
    pub fn external_name(&self) -> &str {
        &self.external_name
    }

    /// Whether a partition survives activation cleanup.
    pub fn is_retained(&self, name: &str) -> bool {
        name == self.static_name || name == self.external_name || self.legacy.iter().any(|l| l == name)
    }
}
