//! Generic retry-with-exponential-backoff, independent of any transport.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Adds up to 50% random extra delay to each wait.
    pub jitter: bool,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            jitter: false,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Wait after the failed attempt with 0-based index `attempt`: `base_delay * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// `backoff` plus jitter when enabled.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.backoff(attempt);
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let extra = rand::thread_rng().gen_range(0.0..=0.5);
        delay + delay.mul_f64(extra)
    }
}

/// Runs `operation` until it succeeds or `policy.max_retries` retries are spent.
/// The closure receives the 0-based attempt number. Returns the last error on exhaustion.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Attempt {} failed ({}), retrying after {}ms...",
                    attempt + 1,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        assert_eq!(policy.backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.backoff(2), Duration::from_millis(4000));
    }

    #[test]
    fn test_backoff_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(policy.backoff(64), Duration::from_secs(u64::from(u32::MAX)));
    }

    #[test]
    fn test_jitter_stays_within_half_of_delay() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100)).with_jitter(true);
        for attempt in 0..3 {
            let base = policy.backoff(attempt);
            for _ in 0..50 {
                let delay = policy.delay_for(attempt);
                assert!(delay >= base && delay <= base + base / 2, "{delay:?}");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries_with_exponential_gaps() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let started = Mutex::new(Vec::new());

        let result: Result<(), String> = retry_with_backoff(policy, |attempt| {
            started.lock().unwrap().push(Instant::now());
            async move { Err(format!("boom {attempt}")) }
        })
        .await;

        assert_eq!(result, Err("boom 3".to_string()));
        let started = started.into_inner().unwrap();
        assert_eq!(started.len(), 4);
        for (n, pair) in started.windows(2).enumerate() {
            assert_eq!(pair[1] - pair[0], policy.backoff(n as u32));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, String> =
            retry_with_backoff(RetryPolicy::new(3, Duration::from_millis(10)), |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 1 {
                        Ok("done")
                    } else {
                        Err("not yet".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> =
            retry_with_backoff(RetryPolicy::new(0, Duration::from_secs(1)), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("nope") }
            })
            .await;

        assert_eq!(result, Err("nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
