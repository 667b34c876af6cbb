use std::future::Future;
use std::time::Duration;

use ingest::FetchError;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::RetryConfig;

pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.initial_backoff_ms, config.max_backoff_ms)
    }

    /// Retry a fetch with exponential backoff. Errors that another attempt
    /// cannot fix (missing or malformed files) are returned right away.
    pub async fn retry<F, Fut, T>(&self, path: &str, mut fetch: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut backoff = self.initial_backoff;
        let mut retries = 0;

        loop {
            let error = match fetch().await {
                Ok(value) => {
                    if retries > 0 {
                        info!(path, attempts = retries + 1, "Fetch recovered");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !error.is_retryable() || retries == self.max_retries {
                if retries > 0 {
                    warn!(path, attempts = retries + 1, error = %error, "Giving up on fetch");
                }
                return Err(error);
            }

            retries += 1;
            warn!(
                path,
                retry = retries,
                max_retries = self.max_retries,
                backoff_ms = backoff.as_millis() as u64,
                error = %error,
                "Transient fetch failure"
            );
            sleep(backoff).await;
            backoff = (backoff * 2).min(self.max_backoff);
        }
    }
}
