use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::config::RetryConfig;
use crate::error::AutodrawError;

/// Bounded retry for the upstream calls: a fixed attempt ceiling with a
/// per-error-kind pause between attempts and none after the last one.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    timeout_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            timeout_delay: Duration::from_millis(config.timeout_delay_ms),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay_for(&self, err: &AutodrawError) -> Duration {
        match err {
            AutodrawError::Timeout(_) => self.timeout_delay,
            _ => self.base_delay,
        }
    }

    /// Transport and status failures retry; a malformed payload on a healthy
    /// connection does not.
    fn is_retryable(err: &AutodrawError) -> bool {
        !matches!(err, AutodrawError::Malformed(_) | AutodrawError::Config(_))
    }

    /// Drives `op` (which receives the zero-based attempt number) until it
    /// succeeds or the ceiling is reached. The final error is returned
    /// unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AutodrawError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AutodrawError>>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || !Self::is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.delay_for(&err);
                    debug!(attempt, ?delay, error = %err, "retrying after failure");
                    sleep(delay).await;
                }
            }
        }
    }
}
