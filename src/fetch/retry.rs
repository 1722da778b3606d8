use reqwest::StatusCode;
use std::time::Duration;

/// Status codes treated as transient and retried
pub const RETRYABLE_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// How many times, and how patiently, to retry a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// Whether a response with `status` should be retried, given how many
    /// retries have already been made
    pub fn should_retry(&self, status: StatusCode, retries_done: u32) -> bool {
        retries_done < self.max_retries && RETRYABLE_STATUSES.contains(&status)
    }

    /// Delay to wait before retry number `retries_done + 1`
    pub fn backoff(&self, retries_done: u32) -> Duration {
        let factor = 1u32.checked_shl(retries_done).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_only_gateway_and_server_errors() {
        let policy = RetryPolicy::default();

        for status in RETRYABLE_STATUSES {
            assert!(policy.should_retry(status, 0), "{status} should retry");
        }

        assert!(!policy.should_retry(StatusCode::NOT_FOUND, 0));
        assert!(!policy.should_retry(StatusCode::FORBIDDEN, 0));
        assert!(!policy.should_retry(StatusCode::TOO_MANY_REQUESTS, 0));
        assert!(!policy.should_retry(StatusCode::NOT_IMPLEMENTED, 0));
    }

    #[test]
    fn test_retry_budget() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        assert!(policy.should_retry(StatusCode::BAD_GATEWAY, 2));
        assert!(!policy.should_retry(StatusCode::BAD_GATEWAY, 3));

        let none = RetryPolicy::new(0, Duration::from_millis(10));
        assert!(!none.should_retry(StatusCode::BAD_GATEWAY, 0));
    }

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert_eq!(policy.backoff(64), Duration::from_secs(u32::MAX as u64));
    }
}
