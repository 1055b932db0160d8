//! Pooled HTTP execution against the allow-listed upstream.
//!
//! # Responsibilities
//! - Perform the proxied call over a shared, bounded connection pool
//! - Enforce the classification-based deadline (OAuth 30s / command 10s)
//! - Translate transport failures into the gateway error taxonomy
//!
//! # Design Decisions
//! - Retries happen here, at the pool layer only: at most three attempts,
//!   idempotent methods, 5xx responses, jittered exponential backoff
//! - Timed-out calls fail closed; nothing is re-issued after the deadline

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, Uri};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::error::GatewayError;
use crate::http::context::RequestContext;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::{is_retryable, MAX_ATTEMPTS};
use crate::resilience::timeouts::timeout_for;

/// HTTP client with a reusable bounded connection pool.
///
/// The connector speaks TLS for `https` targets (the usual case for a
/// CloudFlare-fronted Home Assistant) and plain HTTP for `http` ones.
pub struct UpstreamClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl UpstreamClient {
    pub fn new() -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        Self::from_connector(connector)
    }

    /// Build a client that trusts only the given TLS configuration.
    pub fn with_tls_config(tls: rustls::ClientConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();
        Self::from_connector(connector)
    }

    fn from_connector(connector: HttpsConnector<HttpConnector>) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .build(connector);
        Self { client }
    }

    /// Execute the proxied call and return the upstream status and body.
    pub async fn execute(
        &self,
        context: &RequestContext,
        target_url: &str,
        headers: &HeaderMap,
    ) -> Result<(StatusCode, Bytes), GatewayError> {
        let uri: Uri = target_url
            .parse()
            .map_err(|_| GatewayError::Internal(format!("unparseable target: {target_url}")))?;
        let deadline = timeout_for(context.is_oauth_request());

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut request = Request::builder()
                .method(context.method().clone())
                .uri(uri.clone());
            if let Some(request_headers) = request.headers_mut() {
                *request_headers = headers.clone();
            }
            let request = request
                .body(Body::from(context.body().clone()))
                .map_err(|e| GatewayError::Internal(e.to_string()))?;

            let attempt_future = async {
                let response = self.client.request(request).await.map_err(|e| {
                    if e.is_connect() {
                        tracing::warn!(upstream = %uri, error = %e, "Upstream unreachable");
                        GatewayError::UpstreamUnreachable(e.to_string())
                    } else {
                        GatewayError::Internal(e.to_string())
                    }
                })?;
                let (parts, body) = response.into_parts();
                let collected = body
                    .collect()
                    .await
                    .map_err(|e| GatewayError::Internal(e.to_string()))?;
                Ok::<_, GatewayError>((parts.status, collected.to_bytes()))
            };

            match tokio::time::timeout(deadline, attempt_future).await {
                Err(_) => {
                    tracing::warn!(
                        upstream = %uri,
                        deadline_secs = deadline.as_secs(),
                        "Upstream call exceeded deadline"
                    );
                    return Err(GatewayError::UpstreamTimeout);
                }
                Ok(Err(e)) => return Err(e),
                Ok(Ok((status, body))) => {
                    if attempt < MAX_ATTEMPTS && is_retryable(context.method(), status) {
                        let backoff = calculate_backoff(attempt);
                        tracing::info!(
                            upstream = %uri,
                            attempt,
                            status = status.as_u16(),
                            delay = ?backoff,
                            "Retrying upstream call at pool level"
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    return Ok((status, body));
                }
            }
        }
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}
