//! Per-request routing.
//!
//! Classifies an intercepted request into the strategy that serves it.
//! First match wins, and the order is policy: live data must never be
//! served stale, third-party assets tolerate a short staleness window, and
//! the application's own shell loads from cache whenever present.

use awning_core::Request;

/// The strategy selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not intercepted; the request proceeds as if no worker existed.
    Bypass,
    /// Live-data endpoint: network-first, never cached.
    LiveData,
    /// Cross-origin asset: stale-while-revalidate via EXTERNAL.
    External,
    /// Same-origin asset: cache-first via STATIC.
    Static,
}

/// Classify a request. Decision order (first match wins):
///
/// 1. non-GET → [`Route::Bypass`]
/// 2. hostname matching a live-data provider → [`Route::LiveData`]
/// 3. hostname differing from the application's own → [`Route::External`]
/// 4. same-origin default → [`Route::Static`]
pub fn classify(request: &Request, origin_host: &str, live_hosts: &[String]) -> Route {
    if !request.method.is_get() {
        return Route::Bypass;
    }

    let host = request.host().unwrap_or_default();

    if live_hosts.iter().any(|fragment| host.contains(fragment.as_str())) {
        return Route::LiveData;
    }

    if host != origin_host {
        return Route::External;
    }

    Route::Static
}
