//! Hardened response construction.
//!
//! # Responsibilities
//! - Wrap success and error payloads in JSON with hardened headers
//! - Redact secret-like content from error messages before they are
//!   logged or echoed
//!
//! # Design Decisions
//! - Every response, success or error, carries the same hardened header set
//! - Error bodies never contain upstream detail beyond the scrubbed message

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::security::redact::redact_message;

/// Log severity attached to error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Body shape for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Structured response handed back to the HTTP runtime.
#[derive(Debug)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

const HARDENED_HEADERS: &[(&str, &str)] = &[
    ("cache-control", "no-store, no-cache, must-revalidate"),
    ("pragma", "no-cache"),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("referrer-policy", "no-referrer"),
];

fn hardened_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for &(name, value) in HARDENED_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

impl GatewayResponse {
    /// Wrap a success payload.
    pub fn success(data: serde_json::Value, status: StatusCode) -> Self {
        Self {
            status,
            headers: hardened_headers(),
            body: data,
        }
    }

    /// Wrap an error message, redacting secrets before logging or echoing.
    pub fn error(message: &str, status: StatusCode, severity: Severity) -> Self {
        let scrubbed = redact_message(message);

        match severity {
            Severity::High => {
                tracing::error!(status = status.as_u16(), error = %scrubbed, "Gateway error")
            }
            Severity::Medium => {
                tracing::warn!(status = status.as_u16(), error = %scrubbed, "Gateway error")
            }
            Severity::Low => {
                tracing::info!(status = status.as_u16(), error = %scrubbed, "Gateway error")
            }
        }

        let body = serde_json::to_value(ErrorBody { error: scrubbed })
            .unwrap_or(serde_json::Value::Null);
        Self {
            status,
            headers: hardened_headers(),
            body,
        }
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body.to_string()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
