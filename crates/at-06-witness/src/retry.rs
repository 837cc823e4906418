//! # Retry
//!
//! Generic retry with exponential backoff, bounded jitter, and an optional
//! deadline. Only classified-transient errors retry; protocol-permanent
//! failures surface immediately.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Substrings that mark a failure as protocol-permanent. Everything else
/// is considered transient and retried.
const NON_RETRYABLE_MARKERS: &[&str] = &[
    "bad amount",
    "malformed",
    "invalid field",
    "destination tag",
    "redundant",
    "not connected",
];

/// Whether an error message names a protocol-permanent failure.
pub fn is_non_retryable(message: &str) -> bool {
    let lowered = message.to_lowercase();
    NON_RETRYABLE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Backoff configuration. Passed explicitly; no module-level globals.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    pub max_attempts: u32,
    /// First backoff delay.
    pub base_delay: Duration,
    /// Backoff ceiling.
    pub max_delay: Duration,
    /// Uniform jitter added on top of the exponential delay.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// `min(base_delay × 2^attempt + U[0, jitter), max_delay)`
    fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
        };
        (exponential + jitter).min(self.max_delay)
    }
}

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All attempts failed on transient errors.
    Exhausted {
        /// The final error.
        last: E,
        /// Attempts made.
        attempts: u32,
    },
    /// A protocol-permanent error ended the loop early.
    NonRetryable {
        /// The error.
        error: E,
        /// Attempts made, including the failing one.
        attempts: u32,
    },
    /// The deadline elapsed. In-flight state is untouched.
    Cancelled,
}

/// Run `op` until it succeeds, a non-retryable error surfaces, attempts
/// exhaust, or the deadline elapses.
pub async fn retry_with_backoff<T, E, Fut, Op, Classify>(
    policy: &RetryPolicy,
    is_retryable: Classify,
    deadline: Option<Duration>,
    mut op: Op,
) -> Result<T, RetryError<E>>
where
    Fut: Future<Output = Result<T, E>>,
    Op: FnMut() -> Fut,
    Classify: Fn(&E) -> bool,
{
    let run = async {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let attempts = attempt + 1;
                    if !is_retryable(&error) {
                        return Err(RetryError::NonRetryable { error, attempts });
                    }
                    if attempts >= policy.max_attempts {
                        return Err(RetryError::Exhausted {
                            last: error,
                            attempts,
                        });
                    }
                    let delay = policy.delay_for(attempt);
                    tracing::debug!(
                        "[at-06] transient failure on attempt {}; backing off {:?}",
                        attempts,
                        delay
                    );
                    sleep(delay).await;
                    attempt = attempts;
                }
            }
        }
    };

    match deadline {
        Some(deadline) => timeout(deadline, run)
            .await
            .unwrap_or(Err(RetryError::Cancelled)),
        None => run.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_classifier() {
        assert!(is_non_retryable("temBAD_AMOUNT: bad amount"));
        assert!(is_non_retryable("Transaction is Malformed"));
        assert!(is_non_retryable("invalid field Account"));
        assert!(is_non_retryable("destination tag required"));
        assert!(is_non_retryable("tefREDUNDANT transaction"));
        assert!(is_non_retryable("websocket not connected"));

        assert!(!is_non_retryable("tooBUSY"));
        assert!(!is_non_retryable("connection reset by peer"));
        assert!(!is_non_retryable("timeout waiting for validation"));
    }

    #[test]
    fn test_delay_is_bounded_by_max() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(3),
            jitter: Duration::from_millis(50),
        };
        for attempt in 0..10 {
            assert!(policy.delay_for(attempt) <= policy.max_delay);
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<u32, RetryError<String>> = retry_with_backoff(
            &fast_policy(),
            |_| true,
            None,
            move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("tooBUSY".to_string())
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let result: Result<(), RetryError<String>> = retry_with_backoff(
            &fast_policy(),
            |_| true,
            None,
            || async { Err("tooBUSY".to_string()) },
        )
        .await;
        match result.unwrap_err() {
            RetryError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 4);
                assert_eq!(last, "tooBUSY");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_retryable_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), RetryError<String>> = retry_with_backoff(
            &fast_policy(),
            |error: &String| !is_non_retryable(error),
            None,
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err("temMALFORMED: malformed".to_string()) }
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            RetryError::NonRetryable { attempts: 1, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deadline_cancels() {
        let policy = RetryPolicy {
            max_attempts: 100,
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(20),
            jitter: Duration::ZERO,
        };
        let result: Result<(), RetryError<String>> = retry_with_backoff(
            &policy,
            |_| true,
            Some(Duration::from_millis(30)),
            || async { Err("tooBUSY".to_string()) },
        )
        .await;
        assert!(matches!(result.unwrap_err(), RetryError::Cancelled));
    }
}
