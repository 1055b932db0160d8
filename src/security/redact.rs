//! Secret redaction for log lines and error responses.
//!
//! # Responsibilities
//! - Scrub secret-like terms from error messages before they are logged
//!   or echoed to the client
//! - Mask the values of secret-bearing keys in JSON bodies before logging
//!
//! # Design Decisions
//! - Redaction runs on every error path; no response or log line may carry
//!   an un-redacted secret-like substring
//! - Term matching is case-insensitive plain substring search

/// Marker substituted for anything secret-like.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Terms scrubbed from free-form messages. Longer terms first so compound
/// names (`client_secret`) redact as a unit.
const SENSITIVE_TERMS: &[&str] = &[
    "client_secret",
    "access_token",
    "refresh_token",
    "authorization",
    "credential",
    "cf-access",
    "password",
    "bearer",
    "secret",
    "session",
    "token",
    "oauth",
    "key",
];

/// Keys whose values are masked when scrubbing JSON bodies.
const SENSITIVE_KEYS: &[&str] = &[
    "token",
    "secret",
    "password",
    "authorization",
    "credential",
    "key",
    "session",
];

/// Replace every case-insensitive occurrence of `needle` in `haystack`.
///
/// ASCII lowering keeps byte offsets aligned between the two strings.
fn replace_case_insensitive(haystack: &str, needle: &str, replacement: &str) -> String {
    let lowered = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;

    while let Some(found) = lowered[cursor..].find(&needle) {
        let start = cursor + found;
        out.push_str(&haystack[cursor..start]);
        out.push_str(replacement);
        cursor = start + needle.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}

/// Scrub secret-like terms from a message.
pub fn redact_message(message: &str) -> String {
    let mut scrubbed = message.to_string();
    for term in SENSITIVE_TERMS {
        scrubbed = replace_case_insensitive(&scrubbed, term, REDACTION_MARKER);
    }
    scrubbed
}

/// Mask secret-bearing values in a JSON body.
///
/// Values under keys containing a sensitive term (case-insensitive) are
/// replaced with the redaction marker, recursively. Non-JSON input falls
/// back to message redaction.
pub fn mask_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(mut value) => {
            mask_value(&mut value);
            value.to_string()
        }
        Err(_) => redact_message(body),
    }
}

fn mask_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                let lowered = key.to_lowercase();
                if SENSITIVE_KEYS.iter().any(|k| lowered.contains(k)) {
                    *nested = serde_json::Value::String(REDACTION_MARKER.to_string());
                } else {
                    mask_value(nested);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                mask_value(item);
            }
        }
        _ => {}
    }
}
