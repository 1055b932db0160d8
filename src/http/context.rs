//! Canonical request descriptor.
//!
//! # Responsibilities
//! - Normalize the inbound request into one immutable descriptor
//! - Classify traffic (OAuth token exchange vs. command)
//!
//! # Design Decisions
//! - Built exactly once per invocation, before any security check
//! - Header lookups are case-insensitive (http::HeaderMap semantics)

use std::net::IpAddr;
use std::time::Instant;

use axum::http::{HeaderMap, Method};
use bytes::Bytes;

use crate::resilience::timeouts::is_oauth_path;

/// Immutable descriptor of one inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    source_ip: IpAddr,
    received_at: Instant,
    is_oauth_request: bool,
}

impl RequestContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        body: Bytes,
        source_ip: IpAddr,
    ) -> Self {
        let path = path.into();
        let is_oauth_request = is_oauth_path(&path);
        Self {
            method,
            path,
            headers,
            body,
            source_ip,
            received_at: Instant::now(),
            is_oauth_request,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn source_ip(&self) -> IpAddr {
        self.source_ip
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }

    /// Whether this request is OAuth token traffic (30s upstream deadline).
    pub fn is_oauth_request(&self) -> bool {
        self.is_oauth_request
    }

    /// Operation name used for metrics.
    pub fn operation(&self) -> &'static str {
        if self.is_oauth_request {
            "oauth_proxy"
        } else {
            "command_proxy"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(path: &str) -> RequestContext {
        RequestContext::new(
            Method::POST,
            path,
            HeaderMap::new(),
            Bytes::new(),
            IpAddr::from([127, 0, 0, 1]),
        )
    }

    #[test]
    fn test_oauth_classification() {
        assert!(ctx("/auth/token").is_oauth_request());
        assert!(ctx("/oauth/token").is_oauth_request());
        assert!(!ctx("/api/alexa/smart_home").is_oauth_request());
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(ctx("/auth/token").operation(), "oauth_proxy");
        assert_eq!(ctx("/api/states").operation(), "command_proxy");
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer x".parse().unwrap());
        let ctx = RequestContext::new(
            Method::GET,
            "/api/states",
            headers,
            Bytes::new(),
            IpAddr::from([127, 0, 0, 1]),
        );
        assert!(ctx.headers().get("authorization").is_some());
        assert!(ctx.headers().get("AUTHORIZATION").is_some());
    }
}
