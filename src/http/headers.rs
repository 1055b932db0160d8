//! Proxy header composition.
//!
//! # Responsibilities
//! - Build the CloudFlare Access service-token header pair
//! - Forward a whitelist of client headers, nothing else
//! - Fall back to the configured long-lived token when the client sent no
//!   credentials
//!
//! # Design Decisions
//! - Whitelist approach: headers not listed here never reach the upstream
//! - CloudFlare credentials come only from configuration, never from the
//!   client request

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE,
    USER_AGENT,
};

use crate::config::GatewayConfiguration;
use crate::http::context::RequestContext;

/// CloudFlare Access service-token id header.
pub const CF_ACCESS_CLIENT_ID: HeaderName = HeaderName::from_static("cf-access-client-id");

/// CloudFlare Access service-token secret header.
pub const CF_ACCESS_CLIENT_SECRET: HeaderName = HeaderName::from_static("cf-access-client-secret");

/// Client headers forwarded to the upstream.
const FORWARDED_HEADERS: &[HeaderName] = &[AUTHORIZATION, ACCEPT, ACCEPT_LANGUAGE];

const GATEWAY_USER_AGENT: &str = concat!("ha-gateway/", env!("CARGO_PKG_VERSION"));

/// Build the CloudFlare Access service-token headers.
///
/// Returns an empty map (with a warning) unless both credentials are
/// configured; the upstream will then reject the call at its access layer.
pub fn build_cloudflare_headers(config: &GatewayConfiguration) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if !config.has_cloudflare_credentials() {
        tracing::warn!("CloudFlare Access credentials incomplete; sending no service token");
        return headers;
    }

    match (
        HeaderValue::from_str(&config.cloudflare_client_id),
        HeaderValue::from_str(&config.cloudflare_client_secret),
    ) {
        (Ok(id), Ok(secret)) => {
            headers.insert(CF_ACCESS_CLIENT_ID, id);
            headers.insert(CF_ACCESS_CLIENT_SECRET, secret);
        }
        _ => {
            tracing::warn!("CloudFlare Access credentials contain invalid header bytes");
        }
    }
    headers
}

/// Compose the full header set for the proxied request.
pub fn build_proxy_headers(context: &RequestContext, config: &GatewayConfiguration) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(GATEWAY_USER_AGENT));

    headers.extend(build_cloudflare_headers(config));

    for name in FORWARDED_HEADERS {
        if let Some(value) = context.headers().get(name) {
            headers.insert(name.clone(), value.clone());
        }
    }

    // Unauthenticated clients fall back to the configured long-lived token.
    if !headers.contains_key(AUTHORIZATION) {
        if let Some(token) = &config.fallback_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use bytes::Bytes;
    use std::net::IpAddr;

    fn config(fallback: Option<&str>) -> GatewayConfiguration {
        GatewayConfiguration {
            home_assistant_base_url: "https://ha.example.com".to_string(),
            shared_secret: "s".to_string(),
            cloudflare_client_id: "cf-id.access".to_string(),
            cloudflare_client_secret: "cf-secret".to_string(),
            fallback_token: fallback.map(str::to_string),
        }
    }

    fn context_with(headers: HeaderMap) -> RequestContext {
        RequestContext::new(
            Method::POST,
            "/api/alexa/smart_home",
            headers,
            Bytes::new(),
            IpAddr::from([127, 0, 0, 1]),
        )
    }

    #[test]
    fn test_cloudflare_headers_present_when_configured() {
        let headers = build_cloudflare_headers(&config(None));
        assert_eq!(headers.get(CF_ACCESS_CLIENT_ID).unwrap(), "cf-id.access");
        assert_eq!(headers.get(CF_ACCESS_CLIENT_SECRET).unwrap(), "cf-secret");
    }

    #[test]
    fn test_cloudflare_headers_empty_when_incomplete() {
        let mut cfg = config(None);
        cfg.cloudflare_client_secret = String::new();
        assert!(build_cloudflare_headers(&cfg).is_empty());
    }

    #[test]
    fn test_proxy_headers_forward_whitelist_only() {
        let mut incoming = HeaderMap::new();
        incoming.insert("Authorization", "Bearer client-token".parse().unwrap());
        incoming.insert("Accept", "application/json".parse().unwrap());
        incoming.insert("X-Internal-Header", "nope".parse().unwrap());
        incoming.insert("Cookie", "session=abc".parse().unwrap());

        let headers = build_proxy_headers(&context_with(incoming), &config(None));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer client-token");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert!(headers.get("x-internal-header").is_none());
        assert!(headers.get("cookie").is_none());
    }

    #[test]
    fn test_proxy_headers_include_defaults_and_cf() {
        let headers = build_proxy_headers(&context_with(HeaderMap::new()), &config(None));
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(USER_AGENT).is_some());
        assert!(headers.get(CF_ACCESS_CLIENT_ID).is_some());
    }

    #[test]
    fn test_fallback_token_used_without_client_auth() {
        let headers = build_proxy_headers(&context_with(HeaderMap::new()), &config(Some("llat")));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer llat");
    }

    #[test]
    fn test_client_auth_wins_over_fallback() {
        let mut incoming = HeaderMap::new();
        incoming.insert("authorization", "Bearer client".parse().unwrap());
        let headers = build_proxy_headers(&context_with(incoming), &config(Some("llat")));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer client");
    }
}
