//! Retry with exponential backoff
//!
//! Every network call gets its own attempt counter. After a failed attempt
//! `i` (0-based) the executor sleeps `base_delay * 2^i` before trying again:
//! no jitter, no cap, no budget shared between calls.

use crate::crawler::fetcher::FetchError;
use crate::CrawlError;
use std::future::Future;
use std::time::Duration;

/// Attempt count and base delay for one network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,

    /// Delay after the first failure
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts,
            base_delay,
        }
    }

    /// Sleep before the attempt following failed attempt `attempt_index`
    ///
    /// Saturates at `Duration::MAX` once `base_delay * 2^attempt_index` no
    /// longer fits.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let base_nanos = self.base_delay.as_nanos();
        if base_nanos == 0 {
            return Duration::ZERO;
        }

        let nanos = 2u128
            .checked_pow(attempt_index)
            .and_then(|factor| base_nanos.checked_mul(factor));

        match nanos {
            Some(nanos) => duration_from_nanos(nanos),
            None => Duration::MAX,
        }
    }

    /// Runs `op` until it succeeds or attempts are exhausted
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Transport` carrying the last attempt's error.
    pub async fn run<T, F, Fut>(&self, operation: &str, op: F) -> Result<T, CrawlError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        self.run_with_sleep(operation, op, tokio::time::sleep).await
    }

    /// Same as [`run`](Self::run) with an injectable sleep function
    pub async fn run_with_sleep<T, F, Fut, S, SFut>(
        &self,
        operation: &str,
        mut op: F,
        mut sleep: S,
    ) -> Result<T, CrawlError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
        S: FnMut(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}), retrying in {:?}: {}",
                        operation,
                        attempt + 1,
                        delay,
                        e
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("{} failed after {} attempts: {}", operation, attempts, e);
                    return Err(CrawlError::Transport {
                        operation: operation.to_string(),
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    match u64::try_from(nanos / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}
