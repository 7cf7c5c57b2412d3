//! Rate limiter implementation
//!
//! Sliding window limiter for outgoing chat requests.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the oldest request leaves the window
    pub reset_in: Duration,
}

/// Sliding window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window`
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Check the limit and record the request if it is allowed
    pub async fn check_and_record(&self) -> RateLimitResult {
        self.check_and_record_at(Instant::now()).await
    }

    async fn check_and_record_at(&self, now: Instant) -> RateLimitResult {
        let mut requests = self.requests.lock().await;

        while let Some(&oldest) = requests.front() {
            if now.saturating_duration_since(oldest) < self.window {
                break;
            }
            requests.pop_front();
        }

        let used = requests.len() as u32;
        let allowed = used < self.max_requests;

        if allowed {
            requests.push_back(now);
        }

        let reset_in = requests
            .front()
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or_default();

        RateLimitResult {
            allowed,
            remaining: self.max_requests.saturating_sub(requests.len() as u32),
            limit: self.max_requests,
            reset_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        for expected_remaining in [2, 1, 0] {
            let result = limiter.check_and_record().await;
            assert!(result.allowed);
            assert_eq!(result.remaining, expected_remaining);
        }

        let result = limiter.check_and_record().await;
        assert!(!result.allowed);
        assert_eq!(result.limit, 3);
        assert!(result.reset_in > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_and_record_at(start).await.allowed);
        assert!(limiter.check_and_record_at(start + Duration::from_secs(30)).await.allowed);
        assert!(!limiter.check_and_record_at(start + Duration::from_secs(59)).await.allowed);

        // The first request leaves the window.
        assert!(limiter.check_and_record_at(start + Duration::from_secs(60)).await.allowed);
        assert!(!limiter.check_and_record_at(start + Duration::from_secs(61)).await.allowed);
    }

    #[tokio::test]
    async fn test_rejected_requests_are_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.check_and_record_at(start).await.allowed);
        for i in 1..5 {
            assert!(!limiter.check_and_record_at(start + Duration::from_secs(i)).await.allowed);
        }

        assert!(limiter.check_and_record_at(start + Duration::from_secs(10)).await.allowed);
    }
}
