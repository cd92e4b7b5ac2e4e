//! Backoff controller
//!
//! Tracks the wait interval between requests and the consecutive
//! server-error count for one group's run. The wait starts disabled, sits at
//! the configured minimum while the service behaves, doubles (capped) on
//! unexpected statuses, and the run aborts once server errors pile up.

use crate::config::PacingConfig;
use crate::MothballError;
use std::time::Duration;

/// Per-group wait and error state
#[derive(Debug)]
pub struct Backoff {
    wait: Duration,
    min_wait: Duration,
    max_wait: Duration,
    server_errors: u32,
    max_server_errors: u32,
}

impl Backoff {
    pub fn new(pacing: &PacingConfig) -> Self {
        Self {
            wait: Duration::ZERO,
            min_wait: Duration::from_millis(pacing.min_wait_ms),
            max_wait: Duration::from_millis(pacing.max_wait_ms),
            server_errors: 0,
            max_server_errors: pacing.max_server_errors,
        }
    }

    /// Wait to apply before the next attempt; `None` until the first
    /// response has been observed
    pub fn delay(&self) -> Option<Duration> {
        if self.wait.is_zero() {
            None
        } else {
            Some(self.wait)
        }
    }

    /// Updates the controller with the status of a completed fetch
    ///
    /// * 200 and 404 reset the wait to the minimum: a hole in the id space
    ///   is a legitimate answer, not distress.
    /// * 5xx (and the transport-failure sentinel) counts toward the abort
    ///   threshold; anything else unexpected escalates the wait without
    ///   counting, so unrelated error types cannot mask server distress.
    ///
    /// Returns [`MothballError::TooManyServerErrors`] when the consecutive
    /// 5xx count reaches the configured maximum.
    pub fn observe(&mut self, status: u16) -> crate::Result<()> {
        if status >= 500 {
            self.server_errors += 1;
            if self.server_errors >= self.max_server_errors {
                return Err(MothballError::TooManyServerErrors {
                    count: self.server_errors,
                });
            }
            self.escalate();
        } else {
            self.server_errors = 0;
            match status {
                200 | 404 => self.wait = self.min_wait,
                _ => self.escalate(),
            }
        }
        Ok(())
    }

    fn escalate(&mut self) {
        if self.wait.is_zero() {
            self.wait = self.min_wait;
        } else {
            self.wait = (self.wait * 2).min(self.max_wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacing(min_ms: u64, max_ms: u64, max_errors: u32) -> PacingConfig {
        PacingConfig {
            min_wait_ms: min_ms,
            max_wait_ms: max_ms,
            max_server_errors: max_errors,
        }
    }

    #[test]
    fn test_no_delay_before_first_response() {
        let backoff = Backoff::new(&pacing(100, 10_000, 10));
        assert_eq!(backoff.delay(), None);
    }

    #[test]
    fn test_success_sets_minimum_wait() {
        let mut backoff = Backoff::new(&pacing(100, 10_000, 10));
        backoff.observe(200).unwrap();
        assert_eq!(backoff.delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_hole_behaves_like_success() {
        let mut backoff = Backoff::new(&pacing(100, 10_000, 10));
        backoff.observe(404).unwrap();
        assert_eq!(backoff.delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_server_errors_escalate_monotonically_to_cap() {
        let mut backoff = Backoff::new(&pacing(100, 500, 100));
        let mut waits = Vec::new();
        for _ in 0..6 {
            backoff.observe(500).unwrap();
            waits.push(backoff.delay().unwrap());
        }
        // 100 -> 200 -> 400 -> 500 (capped) -> 500 -> 500
        assert!(waits.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(waits[0], Duration::from_millis(100));
        assert_eq!(waits[1], Duration::from_millis(200));
        assert_eq!(waits.last(), Some(&Duration::from_millis(500)));
    }

    #[test]
    fn test_aborts_exactly_at_threshold() {
        let mut backoff = Backoff::new(&pacing(1, 10, 3));
        backoff.observe(500).unwrap();
        backoff.observe(502).unwrap();
        let err = backoff.observe(500).unwrap_err();
        assert!(matches!(err, MothballError::TooManyServerErrors { count: 3 }));
    }

    #[test]
    fn test_success_resets_server_error_count() {
        let mut backoff = Backoff::new(&pacing(1, 10, 3));
        backoff.observe(500).unwrap();
        backoff.observe(500).unwrap();
        backoff.observe(200).unwrap();
        backoff.observe(500).unwrap();
        backoff.observe(500).unwrap();
        // Still below the threshold because the 200 reset the count.
        assert!(backoff.observe(200).is_ok());
    }

    #[test]
    fn test_other_status_escalates_without_counting() {
        let mut backoff = Backoff::new(&pacing(100, 10_000, 2));
        backoff.observe(403).unwrap();
        assert_eq!(backoff.delay(), Some(Duration::from_millis(100)));
        backoff.observe(403).unwrap();
        assert_eq!(backoff.delay(), Some(Duration::from_millis(200)));
        // 403s never reach the server-error threshold.
        for _ in 0..10 {
            backoff.observe(403).unwrap();
        }
    }

    #[test]
    fn test_other_status_resets_server_error_count() {
        let mut backoff = Backoff::new(&pacing(1, 10, 2));
        backoff.observe(500).unwrap();
        backoff.observe(403).unwrap();
        // Counter was reset by the non-5xx status.
        assert!(backoff.observe(500).is_ok());
    }

    #[test]
    fn test_network_sentinel_counts_as_server_error() {
        let mut backoff = Backoff::new(&pacing(1, 10, 2));
        backoff.observe(crate::client::NETWORK_ERROR_STATUS).unwrap();
        let err = backoff
            .observe(crate::client::NETWORK_ERROR_STATUS)
            .unwrap_err();
        assert!(matches!(err, MothballError::TooManyServerErrors { count: 2 }));
    }
}
