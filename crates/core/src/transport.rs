//! The network seam the worker fetches through.

use crate::http::{CachedResponse, Request};
use crate::Error;

/// Performs a single network fetch attempt.
///
/// Implementations return `Err` only for transport-level failures
/// (connection refused, DNS, timeout); HTTP error statuses come back as
/// ordinary responses so the caller can inspect and forward them. There is
/// no retry, no deduplication of identical in-flight requests, and no
/// cancellation: a hung fetch is bounded only by the implementation's own
/// timeout, if any.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse, Error>;
}
