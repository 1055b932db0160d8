//! Resilience for the single upstream call.
//!
//! # Design Decisions
//! - Timeouts are classification-based (OAuth vs. command traffic)
//! - Jittered backoff prevents hammering a recovering upstream
//! - No circuit breaking: one allow-listed origin, fail closed per call

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::calculate_backoff;
pub use retries::{is_retryable, MAX_ATTEMPTS};
pub use timeouts::{is_oauth_path, timeout_for, COMMAND_TIMEOUT, OAUTH_TIMEOUT};
