use crate::config::RetryConfig;
use crate::error::NetworkError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Bounded retry strategy for remote calls whose loss is user visible
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Whether to double the delay per further attempt
    pub exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            exponential_backoff: true,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.backoff_ms),
            ..Self::default()
        }
    }

    /// Single attempt, no backoff
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given (zero based) failed attempt
    fn calculate_delay(&self, failed_attempt: u32) -> Duration {
        if !self.exponential_backoff {
            return self.base_delay;
        }

        let factor = 2_u32.saturating_pow(failed_attempt);
        let delay = self.base_delay.saturating_mul(factor);

        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    /// The last error is returned when every attempt fails.
    pub async fn run<T, F, Fut>(&self, name: &str, mut operation: F) -> Result<T, NetworkError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NetworkError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("{} succeeded on attempt {}/{}", name, attempt + 1, attempts);
                    }
                    return Ok(value);
                }
                Err(e) if attempt + 1 < attempts => {
                    let delay = self.calculate_delay(attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:?}",
                        name,
                        attempt + 1,
                        attempts,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
