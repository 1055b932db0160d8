//! Input validation and path sanitization.
//!
//! # Responsibilities
//! - Reject strings carrying markup or script-injection fragments
//! - Enforce the maximum request payload size
//! - Normalize request paths (no traversal, no doubled slashes)
//!
//! # Design Decisions
//! - Validation never panics; callers get a plain bool
//! - The substring blocklist intentionally matches the original gateway's
//!   behavior rather than a strict allow-list, so malformed-but-benign
//!   inputs are rejected (or accepted) identically

/// Maximum accepted request body, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Substrings rejected anywhere in a validated string, case-insensitively.
const BLOCKED_SUBSTRINGS: &[&str] = &[
    "<",
    ">",
    "\"",
    "'",
    "javascript:",
    "data:",
    "onerror=",
    "onload=",
    "onclick=",
];

/// Validate a header or path value against length and content rules.
///
/// Returns `false` for empty values (unless `allow_empty`), values longer
/// than `max_len`, or values containing any blocklisted substring.
pub fn validate_string(value: &str, max_len: usize, allow_empty: bool) -> bool {
    if value.is_empty() {
        return allow_empty;
    }
    if value.len() > max_len {
        return false;
    }
    let lowered = value.to_ascii_lowercase();
    !BLOCKED_SUBSTRINGS.iter().any(|s| lowered.contains(s))
}

/// Check the request body against the payload bound.
pub fn validate_payload_size(body: &[u8]) -> bool {
    body.len() <= MAX_PAYLOAD_BYTES
}

/// Sanitize a request path for forwarding.
///
/// Strips traversal tokens (`..`, encoded variants), backslashes, collapses
/// repeated slashes, and guarantees a leading `/`.
pub fn sanitize_path(path: &str) -> String {
    let mut cleaned = path.replace('\\', "");

    // Encoded traversal tokens first, then the literal form.
    for token in ["%2e%2e", "%2E%2E", "%2e.", ".%2e", ".."] {
        while cleaned.contains(token) {
            cleaned = cleaned.replace(token, "");
        }
    }

    while cleaned.contains("//") {
        cleaned = cleaned.replace("//", "/");
    }

    if cleaned.starts_with('/') {
        cleaned
    } else {
        format!("/{cleaned}")
    }
}
