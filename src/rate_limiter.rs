//! # Feature: Rate Limiting
//!
//! Caps how many requests one client may send to the chat boundary inside a
//! sliding window. Uses DashMap for thread-safe concurrent access. Rejected
//! requests are answered immediately; nothing ever waits for the window.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Non-blocking checks only, stale client cleanup
//! - 1.0.0: Initial release with per-client sliding window rate limiting

use dashmap::DashMap;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    requests: DashMap<String, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Record a request for `client` and report whether it is allowed
    pub fn check_rate_limit(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry(client.to_string()).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }

    /// Requests `client` may still make in the current window
    pub fn remaining(&self, client: &str) -> usize {
        let now = Instant::now();
        let used = self
            .requests
            .get(client)
            .map(|times| {
                times
                    .iter()
                    .filter(|&&time| now.duration_since(time) < self.time_window)
                    .count()
            })
            .unwrap_or(0);
        self.max_requests.saturating_sub(used)
    }

    /// Drop clients with no requests inside the window. Returns how many were dropped.
    pub fn purge_stale(&self) -> usize {
        let now = Instant::now();
        let before = self.requests.len();
        self.requests.retain(|_, times| {
            times
                .last()
                .is_some_and(|&last| now.duration_since(last) < self.time_window)
        });
        before - self.requests.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        // 100 requests per 15 minutes
        Self::new(100, Duration::from_secs(15 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_rate_limiter_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));

        assert!(limiter.check_rate_limit("user1"));
        assert!(limiter.check_rate_limit("user1"));
        assert!(limiter.check_rate_limit("user1"));
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));

        assert!(limiter.check_rate_limit("user1"));
        assert!(limiter.check_rate_limit("user1"));
        assert!(!limiter.check_rate_limit("user1"));
        assert_eq!(limiter.remaining("user1"), 0);
    }

    #[test]
    fn test_rate_limiter_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.check_rate_limit("user1"));
        assert!(!limiter.check_rate_limit("user1"));

        sleep(Duration::from_millis(150));
        assert!(limiter.check_rate_limit("user1"));
    }

    #[test]
    fn test_rate_limiter_per_client() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.check_rate_limit("user1"));
        assert!(limiter.check_rate_limit("user2"));
        assert!(!limiter.check_rate_limit("user1"));
        assert!(!limiter.check_rate_limit("user2"));
    }

    #[test]
    fn test_remaining_and_purge() {
        let limiter = RateLimiter::new(5, Duration::from_millis(50));
        assert_eq!(limiter.remaining("user1"), 5);

        limiter.check_rate_limit("user1");
        limiter.check_rate_limit("user1");
        assert_eq!(limiter.remaining("user1"), 3);

        sleep(Duration::from_millis(80));
        assert_eq!(limiter.purge_stale(), 1);
        assert_eq!(limiter.remaining("user1"), 5);
    }
}
