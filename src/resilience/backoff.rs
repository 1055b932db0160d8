//! Exponential backoff with jitter for pool-level retries.

use std::time::Duration;

use rand::Rng;

/// Backoff factor between pool-level retry attempts.
pub const BACKOFF_FACTOR_MS: u64 = 300;

/// Calculate the exponential backoff delay for a retry attempt.
///
/// attempt 1 → ~300ms, attempt 2 → ~600ms, attempt 3 → ~1200ms,
/// plus up to 10% jitter.
pub fn calculate_backoff(attempt: u32) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = BACKOFF_FACTOR_MS.saturating_mul(exponential_base);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_growth() {
        let b1 = calculate_backoff(1);
        assert!(b1.as_millis() >= 300);
        assert!(b1.as_millis() < 400);

        let b2 = calculate_backoff(2);
        assert!(b2.as_millis() >= 600);

        let b3 = calculate_backoff(3);
        assert!(b3.as_millis() >= 1200);
    }

    #[test]
    fn test_zero_attempt_no_delay() {
        assert_eq!(calculate_backoff(0), Duration::from_millis(0));
    }
}
