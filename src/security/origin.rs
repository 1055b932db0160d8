//! Single-origin allow-list check (SSRF boundary).
//!
//! # Design Decisions
//! - This is the only place a destination decision is made; nothing else in
//!   the gateway may pick an origin
//! - Comparison is by normalized string prefix, so `https://ha.example.com`
//!   authorizes itself and any path under it, and nothing else

/// Decide whether `target` falls under the allow-listed base origin.
///
/// Both URLs are normalized by stripping trailing slashes. The target is
/// authorized iff it equals the base exactly or extends it with a path
/// segment (`base + "/..."`). Prefix tricks such as
/// `https://ha.example.com.evil.com` do not pass.
pub fn is_authorized(target: &str, allowed_base: &str) -> bool {
    let target = target.trim_end_matches('/');
    let allowed = allowed_base.trim_end_matches('/');

    if allowed.is_empty() {
        return false;
    }

    target == allowed || target.starts_with(&format!("{allowed}/"))
}
