//! Gateway error taxonomy.
//!
//! # Design Decisions
//! - Every error maps to exactly one HTTP status code
//! - Validation and authorization failures become structured responses,
//!   never panics or raw errors to the runtime
//! - Upstream transport errors are translated, not leaked

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced while handling a single gateway request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Gateway settings could not be loaded or were invalid.
    #[error("configuration unavailable: {0}")]
    Config(String),

    /// The configured target is outside the allow-listed origin.
    #[error("target origin not authorized")]
    Unauthorized,

    /// The source IP exceeded the sliding-window request limit.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The request body exceeded the payload bound.
    #[error("request payload too large")]
    PayloadTooLarge,

    /// A header or path failed input validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The upstream call exceeded its deadline.
    #[error("upstream request timed out")]
    UpstreamTimeout,

    /// The upstream could not be reached (connect/DNS failure).
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Catch-all for unexpected failures.
    #[error("internal gateway error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unauthorized => StatusCode::FORBIDDEN,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error should be logged as a security event.
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            GatewayError::Unauthorized
                | GatewayError::RateLimited
                | GatewayError::PayloadTooLarge
                | GatewayError::InvalidInput(_)
        )
    }
}

/// Errors produced while fetching or decoding gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("secret store path not found: {0}")]
    PathNotFound(String),

    #[error("failed to read secret store: {0}")]
    Store(#[from] std::io::Error),

    #[error("required configuration key missing: {0}")]
    MissingKey(&'static str),

    #[error("configuration value for {0} is empty")]
    EmptyValue(&'static str),
}
