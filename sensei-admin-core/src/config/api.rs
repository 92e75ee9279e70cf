//! Admin API connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{AdminError, AdminResult};
use super::defaults::*;
use super::parse_duration_from_env;

/// Where and how to reach the Sensei admin API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the admin API, e.g. `http://127.0.0.1:5401/api`
    pub base_url: String,

    /// Timeout for a single request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Retry policy for idempotent requests
    pub retry: RetryConfig,
}

/// Retry configuration for listing requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    /// Maximum delay between retries
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: duration_ms(DEFAULT_REQUEST_TIMEOUT_MS),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            initial_delay: duration_ms(DEFAULT_RETRY_INITIAL_DELAY_MS),
            max_delay: duration_ms(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: DEFAULT_RETRY_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after `attempt` failed attempts.
    ///
    /// Saturates at `max_delay`, including when the exponent overflows.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .map(|delay| delay.min(self.max_delay))
            .unwrap_or(self.max_delay)
    }
}

impl ApiConfig {
    /// Overlay environment variables onto this configuration
    pub fn apply_env(&mut self) -> AdminResult<()> {
        if let Ok(url) = std::env::var("SENSEI_ADMIN_API_URL") {
            self.base_url = url;
        }

        self.request_timeout =
            parse_duration_from_env("SENSEI_ADMIN_REQUEST_TIMEOUT_MS", self.request_timeout)?;

        if let Ok(val) = std::env::var("SENSEI_ADMIN_RETRY_ATTEMPTS") {
            self.retry.max_attempts = val.parse().map_err(|_| {
                AdminError::ConfigError("Invalid SENSEI_ADMIN_RETRY_ATTEMPTS".to_string())
            })?;
        }

        Ok(())
    }

    /// Validate API configuration
    pub fn validate(&self) -> AdminResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            AdminError::ConfigError(format!("Invalid api.base_url '{}': {}", self.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AdminError::ConfigError(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(AdminError::ConfigError(
                "api.request_timeout must be non-zero".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(AdminError::ConfigError(
                "api.retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if !self.retry.backoff_multiplier.is_finite() || self.retry.backoff_multiplier < 1.0 {
            return Err(AdminError::ConfigError(
                "api.retry.backoff_multiplier must be a finite number >= 1.0".to_string(),
            ));
        }

        Ok(())
    }
}
