//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (AWNING_*)
//! 2. TOML config file (if AWNING_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The asset lists and the cache version are deploy-time configuration: the
//! version must be bumped on every deploy that changes cached content so
//! activation cleanup retires the previous partitions.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (AWNING_*)
/// 2. TOML config file (if AWNING_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The application's own origin (scheme + host, optional port).
    ///
    /// Requests to this host are same-origin and served cache-first from
    /// the STATIC partition; static asset paths resolve against it.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Prefix shared by all partition names.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Version tag embedded in partition names. Bump on every deploy that
    /// changes cached content.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Reserved partition names retained during activation cleanup.
    ///
    /// Empty means "retain the pre-split combined cache name"; see
    /// `PartitionRegistry::from_config`.
    #[serde(default)]
    pub legacy_caches: Vec<String>,

    /// Local asset paths pre-cached into STATIC at install.
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,

    /// Third-party asset URLs pre-cached into EXTERNAL at install.
    #[serde(default)]
    pub external_assets: Vec<String>,

    /// Hostname fragments identifying live-data providers; matching
    /// requests are never served stale and never cached.
    #[serde(default)]
    pub live_hosts: Vec<String>,

    /// The only sync-trigger tag that provokes the data-resync broadcast.
    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,

    /// Root-document path served to navigation requests when both cache
    /// and network fail. Must be one of `static_assets`.
    #[serde(default = "default_offline_fallback")]
    pub offline_fallback: String,

    /// Path to the SQLite partition store.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for outgoing fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Transport timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_origin() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_cache_prefix() -> String {
    "awning".into()
}

fn default_cache_version() -> String {
    "v1".into()
}

fn default_static_assets() -> Vec<String> {
    vec!["/".into(), "/index.html".into()]
}

fn default_sync_tag() -> String {
    "sync-data".into()
}

fn default_offline_fallback() -> String {
    "/".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./awning-cache.sqlite")
}

fn default_user_agent() -> String {
    "awning/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            cache_prefix: default_cache_prefix(),
            cache_version: default_cache_version(),
            legacy_caches: Vec::new(),
            static_assets: default_static_assets(),
            external_assets: Vec::new(),
            live_hosts: Vec::new(),
            sync_tag: default_sync_tag(),
            offline_fallback: default_offline_fallback(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `AWNING_`
    /// 2. TOML file from `AWNING_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or validation
    /// fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("AWNING_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("AWNING_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.origin, "http://127.0.0.1:8080");
        assert_eq!(config.cache_prefix, "awning");
        assert_eq!(config.cache_version, "v1");
        assert_eq!(config.static_assets, vec!["/".to_string(), "/index.html".to_string()]);
        assert!(config.external_assets.is_empty());
        assert!(config.live_hosts.is_empty());
        assert_eq!(config.sync_tag, "sync-data");
        assert_eq!(config.offline_fallback, "/");
        assert_eq!(config.db_path, PathBuf::from("./awning-cache.sqlite"));
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
