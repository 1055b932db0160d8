//! Sliding-window per-IP rate limiting.
//!
//! # Design Decisions
//! - Trailing 60s window, pruned lazily on each check
//! - Concurrent map (DashMap) so the gateway can serve requests in parallel
//! - Bounded growth: stale IP entries are evicted once the map passes a cap

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Trailing window inspected for each source IP.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Maximum requests allowed per IP inside one window.
pub const MAX_REQUESTS_PER_WINDOW: usize = 150;

/// Soft cap on tracked IPs before stale entries are swept.
const TRACKED_IP_CAP: usize = 10_000;

/// Process-wide sliding-window limiter keyed by source IP.
#[derive(Default)]
pub struct RateLimiter {
    requests: DashMap<IpAddr, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request from `ip` and decide whether it is allowed.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        if self.requests.len() > TRACKED_IP_CAP {
            self.sweep_stale(now);
        }

        let mut entry = self.requests.entry(ip).or_default();
        prune_expired(&mut entry, now.checked_sub(WINDOW));

        if entry.len() >= MAX_REQUESTS_PER_WINDOW {
            return false;
        }

        entry.push(now);
        true
    }

    /// Drop IPs whose every timestamp has aged out of the window.
    fn sweep_stale(&self, now: Instant) {
        // No cutoff means nothing can have aged out yet.
        let Some(cutoff) = now.checked_sub(WINDOW) else {
            return;
        };
        self.requests
            .retain(|_, timestamps| timestamps.iter().any(|&t| t > cutoff));
    }

    /// Number of IPs currently tracked.
    pub fn tracked_ips(&self) -> usize {
        self.requests.len()
    }
}

/// Remove timestamps at or before the cutoff. A `None` cutoff means the
/// clock has not yet run for a full window, so every timestamp still
/// counts against the limit.
fn prune_expired(timestamps: &mut Vec<Instant>, cutoff: Option<Instant>) {
    if let Some(cutoff) = cutoff {
        timestamps.retain(|&t| t > cutoff);
    }
}
