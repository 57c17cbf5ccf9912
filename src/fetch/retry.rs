use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{error, warn};

use super::{Page, PageSource};
use crate::config::Settings;
use crate::error::{AttemptError, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
    pub request_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        RetryPolicy {
            max_attempts: settings.max_attempts,
            backoff_unit: settings.backoff_unit(),
            request_timeout: settings.request_timeout(),
        }
    }

    /// Wait after failed attempt `attempt` (1-based). Linear, and the same for
    /// rate limiting as for every other failure.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Fetch one page, retrying every failure until `max_attempts` is spent.
pub async fn fetch_with_retry<S: PageSource>(
    source: &S,
    page: u32,
    policy: &RetryPolicy,
) -> Result<Page, FetchError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let outcome = match timeout(policy.request_timeout, source.fetch_page(page)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AttemptError::Timeout(policy.request_timeout)),
        };

        let err = match outcome {
            Ok(p) => return Ok(p),
            Err(e) => e,
        };

        if attempt >= policy.max_attempts {
            error!(
                "Failed to fetch page {} after {} attempts: {}",
                page, attempt, err
            );
            return Err(FetchError::ExhaustedRetries {
                page,
                attempts: attempt,
                last: err,
            });
        }

        let backoff = policy.backoff(attempt);
        warn!(
            rate_limited = err.is_rate_limited(),
            "Page {} attempt {}/{} failed ({}), backing off {:.1}s",
            page,
            attempt,
            policy.max_attempts,
            err,
            backoff.as_secs_f64()
        );
        sleep(backoff).await;
    }
}
