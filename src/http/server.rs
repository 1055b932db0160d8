//! HTTP server and per-request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router catching every method and path
//! - Orchestrate one invocation through the gateway stages:
//!   Received → Validated → Configured → Authorized → Proxied → Responded
//! - Short-circuit on the first failed check with the matching status
//! - Record an operation metric on every path, failures included
//!
//! # Design Decisions
//! - No cross-invocation state beyond the rate-limit map and config cache
//! - Security denials emit exactly one security-event log line
//! - The upstream body is JSON-decoded when possible, else wrapped as
//!   `{"response": rawBody}`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ConfigCache;
use crate::error::GatewayError;
use crate::http::context::RequestContext;
use crate::http::headers::build_proxy_headers;
use crate::http::response::{GatewayResponse, Severity};
use crate::observability::metrics;
use crate::resilience::timeouts::is_oauth_path;
use crate::security::{
    is_authorized, mask_body, sanitize_path, validate_payload_size, validate_string,
    RateLimiter, MAX_PAYLOAD_BYTES,
};
use crate::upstream::UpstreamClient;

/// Upper bound for validated header values.
const MAX_HEADER_LEN: usize = 1024;

/// Upper bound for the request path.
const MAX_PATH_LEN: usize = 2048;

/// Headers whose content is validated before dispatch.
const VALIDATED_HEADERS: &[&str] = &["authorization", "accept", "accept-language"];

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>,
    pub config_cache: Arc<ConfigCache>,
    pub upstream: Arc<UpstreamClient>,
    pub allowed_base_url: Arc<str>,
}

/// The gateway HTTP server.
pub struct Gateway {
    router: Router,
}

impl Gateway {
    /// Assemble the gateway with its injected dependencies.
    pub fn new(config_cache: ConfigCache, allowed_base_url: &str) -> Self {
        Self::with_upstream(config_cache, allowed_base_url, UpstreamClient::new())
    }

    /// Assemble the gateway around a specific upstream client, e.g. one
    /// trusting a private certificate authority.
    pub fn with_upstream(
        config_cache: ConfigCache,
        allowed_base_url: &str,
        upstream: UpstreamClient,
    ) -> Self {
        let state = AppState {
            rate_limiter: Arc::new(RateLimiter::new()),
            config_cache: Arc::new(config_cache),
            upstream: Arc::new(upstream),
            allowed_base_url: Arc::from(allowed_base_url),
        };

        let router = Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Handle one invocation end to end.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let operation = if is_oauth_path(&path) {
        "oauth_proxy"
    } else {
        "command_proxy"
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %path,
        client_ip = %addr.ip(),
        "Dispatching request"
    );

    // Received: buffer the body. The read is capped at twice the payload
    // limit; anything between the limit and the cap still gets a clean 413
    // from the validator, and the engine never runs either way.
    let body_bytes = match axum::body::to_bytes(body, MAX_PAYLOAD_BYTES * 2).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let response = deny(classify_body_error(&e), request_id, addr.ip());
            metrics::record_request(operation, response.status.as_u16(), start);
            return response.into_response();
        }
    };

    let context = RequestContext::new(parts.method, path, parts.headers, body_bytes, addr.ip());

    let response = match proxy(&state, &context).await {
        Ok(response) => response,
        Err(e) => deny(e, request_id, addr.ip()),
    };

    metrics::record_request(operation, response.status.as_u16(), start);
    response.into_response()
}

/// Run the staged checks and the proxied call for one request.
async fn proxy(
    state: &AppState,
    context: &RequestContext,
) -> Result<GatewayResponse, GatewayError> {
    // Validated
    if !state.rate_limiter.check(context.source_ip()) {
        return Err(GatewayError::RateLimited);
    }
    if !validate_payload_size(context.body()) {
        return Err(GatewayError::PayloadTooLarge);
    }
    if !validate_string(context.path(), MAX_PATH_LEN, true) {
        return Err(GatewayError::InvalidInput("request path rejected".into()));
    }
    for name in VALIDATED_HEADERS {
        if let Some(value) = context.headers().get(*name) {
            let value = value
                .to_str()
                .map_err(|_| GatewayError::InvalidInput(format!("header {name} rejected")))?;
            if !validate_string(value, MAX_HEADER_LEN, false) {
                return Err(GatewayError::InvalidInput(format!("header {name} rejected")));
            }
        }
    }

    // Configured
    let config = state
        .config_cache
        .cached_load()
        .ok_or_else(|| GatewayError::Config("configuration unavailable".into()))?;

    // Authorized: the sole SSRF boundary.
    if !is_authorized(&config.home_assistant_base_url, &state.allowed_base_url) {
        return Err(GatewayError::Unauthorized);
    }

    // Proxied
    let target = format!(
        "{}{}",
        config.home_assistant_base_url.trim_end_matches('/'),
        sanitize_path(context.path())
    );
    let headers = build_proxy_headers(context, &config);
    let (status, body) = state.upstream.execute(context, &target, &headers).await?;

    // Responded
    let payload = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(json) => json,
        Err(_) => serde_json::json!({ "response": String::from_utf8_lossy(&body) }),
    };

    tracing::debug!(
        operation = context.operation(),
        upstream_status = status.as_u16(),
        body = %mask_body(&payload.to_string()),
        "Upstream responded"
    );

    Ok(GatewayResponse::success(payload, status))
}

/// Turn an error into a hardened response, logging security events once.
fn deny(error: GatewayError, request_id: Uuid, client_ip: std::net::IpAddr) -> GatewayResponse {
    if error.is_security_event() {
        let kind = security_kind(&error);
        tracing::warn!(
            request_id = %request_id,
            client_ip = %client_ip,
            kind,
            "Security event"
        );
        metrics::record_security_event(kind);
    }
    GatewayResponse::error(&error.to_string(), error.status_code(), severity_for(&error))
}

/// Map a body-buffering failure to the right denial. Only hitting the
/// length cap is an oversized payload; anything else (a client dropping
/// the connection mid-body, a stream error) is a malformed request.
fn classify_body_error(error: &axum::Error) -> GatewayError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = source {
        if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
            return GatewayError::PayloadTooLarge;
        }
        source = e.source();
    }
    GatewayError::InvalidInput("request body could not be read".to_string())
}

fn security_kind(error: &GatewayError) -> &'static str {
    match error {
        GatewayError::RateLimited => "rate_limited",
        GatewayError::PayloadTooLarge => "payload_too_large",
        GatewayError::InvalidInput(_) => "invalid_input",
        GatewayError::Unauthorized => "origin_blocked",
        _ => "other",
    }
}

fn severity_for(error: &GatewayError) -> Severity {
    match error {
        GatewayError::Config(_) | GatewayError::Internal(_) => Severity::High,
        GatewayError::Unauthorized
        | GatewayError::RateLimited
        | GatewayError::UpstreamTimeout
        | GatewayError::UpstreamUnreachable(_) => Severity::Medium,
        GatewayError::PayloadTooLarge | GatewayError::InvalidInput(_) => Severity::Low,
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
