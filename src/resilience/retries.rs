//! Pool-level retry policy.
//!
//! # Design Decisions
//! - Retries live at the connection-pool layer only; the dispatcher never
//!   re-issues a request on its own
//! - Only idempotent methods are retried, and only on 5xx responses
//! - Bounded at three attempts with exponential backoff

use axum::http::{Method, StatusCode};

/// Maximum attempts per upstream call (first try included).
pub const MAX_ATTEMPTS: u32 = 3;

/// Decide whether a response may be retried at the pool level.
pub fn is_retryable(method: &Method, status: StatusCode) -> bool {
    method.is_idempotent() && status.is_server_error()
}
