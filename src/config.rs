use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com/api/patients";
const ENV_PREFIX: &str = "VITALS";

/// What a run does when one page exhausts its retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort and return the error; nothing from earlier pages survives.
    #[default]
    FailFast,
    /// Stop fetching and hand back what was gathered, marked incomplete.
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub api_key: String,
    pub page_size: u32,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    pub backoff_unit_ms: u64,
    pub page_delay_ms: u64,
    pub failure_policy: FailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            page_size: 10,
            request_timeout_ms: 5000,
            max_attempts: 5,
            backoff_unit_ms: 1000,
            page_delay_ms: 1000,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl Settings {
    /// Defaults, then an optional settings file, then `VITALS_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layered(file, None)
    }

    /// `env` replaces the process environment when given.
    fn load_layered(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(invalid(
                "api_key",
                "must be set (VITALS_API_KEY or --api-key)",
            ));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Copy safe to print: the credential is masked.
    pub fn redacted(&self) -> Settings {
        let mut copy = self.clone();
        if !copy.api_key.is_empty() {
            let len = copy.api_key.chars().count();
            let tail: String = copy.api_key.chars().skip(len.saturating_sub(4)).collect();
            copy.api_key = format!("****{}", tail);
        }
        copy
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}
