use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry with a constant pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Pause between two consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retry
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Run `op` until it succeeds or the attempt budget is spent.
///
/// `op` receives the 1-based attempt number. The error of the last attempt is
/// returned unchanged.
pub async fn retry_with_delay<T, E, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!("Attempting to fetch (attempt {}/{}): {}", attempt, attempts, what);
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("Fetch attempt {}/{} failed: {}", attempt, attempts, e);
                if attempt >= attempts {
                    return Err(e);
                }
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_two_delays() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<u32, String> = retry_with_delay(&policy, "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(format!("HTTP 503 on attempt {}", attempt))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        let elapsed = started.elapsed();
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(elapsed >= Duration::from_millis(2000), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(3000), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_return_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = retry_with_delay(&policy, "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("HTTP 500: boom #{}", attempt)) }
        })
        .await;

        assert_eq!(result, Err("HTTP 500: boom #3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_wait() {
        let started = Instant::now();
        let result: Result<&str, String> =
            retry_with_delay(&RetryPolicy::default(), "test", |_| async { Ok("ok") }).await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
