//! Per-call deadline selection.
//!
//! # Design Decisions
//! - OAuth token exchanges ride a slower path through the downstream
//!   server, so they get a longer deadline than command traffic
//! - The deadline is hard: after it lapses the call fails closed (504)

use std::time::Duration;

/// Deadline for OAuth token-exchange requests.
pub const OAUTH_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for everything else (commands, state queries).
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Path fragments that mark a request as OAuth traffic.
const OAUTH_PATH_MARKERS: &[&str] = &["/auth/token", "/oauth/token", "/token"];

/// Classify a request path as OAuth token traffic.
pub fn is_oauth_path(path: &str) -> bool {
    OAUTH_PATH_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Pick the upstream deadline for a request path.
pub fn timeout_for(is_oauth: bool) -> Duration {
    if is_oauth {
        OAUTH_TIMEOUT
    } else {
        COMMAND_TIMEOUT
    }
}
