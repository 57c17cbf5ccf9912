use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// A single failed request. Always retried while attempts remain.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("upstream returned {0}")]
    Status(StatusCode),

    #[error("undecodable page body: {0}")]
    Body(#[from] serde_json::Error),
}

impl AttemptError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AttemptError::Status(s) if *s == StatusCode::TOO_MANY_REQUESTS)
    }
}

/// Terminal failure of a multi-page run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page {page} failed after {attempts} attempts: {last}")]
    ExhaustedRetries {
        page: u32,
        attempts: u32,
        #[source]
        last: AttemptError,
    },
}

impl FetchError {
    pub fn page(&self) -> u32 {
        match self {
            FetchError::ExhaustedRetries { page, .. } => *page,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
