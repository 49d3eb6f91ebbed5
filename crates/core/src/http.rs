//! Request/response model for intercepted traffic.
//!
//! Requests are canonically identified by method + absolute URL; bodies and
//! credentials never participate in cache identity. Responses are stored
//! snapshots (status, headers, body bytes) plus the synthetic responses the
//! worker fabricates when both cache and network fail.

use url::Url;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Only GET requests are ever intercepted or cached.
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }
}

/// An intercepted outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    /// Whether this is a page-navigation request (top-level document load).
    pub is_navigation: bool,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, is_navigation: false }
    }

    /// A plain GET request for a subresource.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// A page-navigation GET request.
    pub fn navigation(url: Url) -> Self {
        Self { method: Method::Get, url, is_navigation: true }
    }

    /// Hostname of the request target, if the URL has one.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}

/// A stored or fabricated response snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    /// Ordered header list, preserved as received.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16) -> Self {
        Self { status, headers: Vec::new(), body: Vec::new() }
    }

    pub fn with_body(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is in the success range (2xx).
    pub fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Synthetic response for a same-origin request with no cache or network.
    pub fn offline_text() -> Self {
        Self::with_body(503, &b"Offline"[..])
    }

    /// Synthetic response for an external asset with no cache or network.
    pub fn offline_empty() -> Self {
        Self::new(503)
    }

    /// Synthetic response telling the caller a live-data endpoint is
    /// unreachable; consumers switch to a degraded offline mode on it.
    pub fn offline_json() -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: br#"{"offline":true}"#.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_only_get_is_get() {
        assert!(Method::Get.is_get());
        assert!(!Method::Post.is_get());
        assert!(!Method::Head.is_get());
    }

    #[test]
    fn test_request_constructors() {
        let req = Request::get(parse("https://app.example.com/index.html"));
        assert_eq!(req.method, Method::Get);
        assert!(!req.is_navigation);

        let nav = Request::navigation(parse("https://app.example.com/"));
        assert!(nav.is_navigation);
        assert_eq!(nav.host(), Some("app.example.com"));
    }

    #[test]
    fn test_response_ok_range() {
        assert!(CachedResponse::new(200).ok());
        assert!(CachedResponse::new(204).ok());
        assert!(CachedResponse::new(299).ok());
        assert!(!CachedResponse::new(304).ok());
        assert!(!CachedResponse::new(404).ok());
        assert!(!CachedResponse::new(503).ok());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut resp = CachedResponse::new(200);
        resp.headers.push(("Content-Type".to_string(), "text/html".to_string()));
        assert_eq!(resp.header("content-type"), Some("text/html"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_offline_text() {
        let resp = CachedResponse::offline_text();
        assert_eq!(resp.status, 503);
        assert_eq!(resp.body, b"Offline");
    }

    #[test]
    fn test_offline_empty() {
        let resp = CachedResponse::offline_empty();
        assert_eq!(resp.status, 503);
        assert!(resp.body.is_empty());
    }

    #[test]
    fn test_offline_json_exact_body() {
        let resp = CachedResponse::offline_json();
        assert!(resp.ok());
        assert_eq!(resp.body, br#"{"offline":true}"#);
        assert_eq!(resp.header("content-type"), Some("application/json"));
    }
}
