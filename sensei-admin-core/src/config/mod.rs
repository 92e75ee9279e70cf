//! Configuration for the admin console
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file, then `SENSEI_ADMIN_*` environment variables. Command-line flags are
//! applied last by the front end, after which the result is validated.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::error::{AdminError, AdminResult};

pub mod defaults;
pub mod api;

pub use defaults::*;
pub use api::{ApiConfig, RetryConfig};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Admin API connection
    pub api: ApiConfig,

    /// Node listing behaviour
    pub list: ListConfig,

    /// Terminal UI behaviour
    pub ui: UiConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Rows per page (`take`)
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Interval between UI ticks; clipboard feedback expiry is checked on ticks
    #[serde(with = "humantime_serde")]
    pub tick_rate: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,

    /// Log file used while the terminal UI owns the screen
    pub file: PathBuf,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate: duration_ms(DEFAULT_TICK_RATE_MS),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AdminConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AdminError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: AdminConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> AdminResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve file (if any) and environment layers, then validate
    pub fn load(path: Option<&Path>) -> AdminResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `SENSEI_ADMIN_*` environment variables
    pub fn apply_env(&mut self) -> AdminResult<()> {
        self.api.apply_env()?;

        if let Ok(val) = std::env::var("SENSEI_ADMIN_PAGE_SIZE") {
            self.list.page_size = val.parse().map_err(|_| {
                AdminError::ConfigError("Invalid SENSEI_ADMIN_PAGE_SIZE".to_string())
            })?;
        }

        self.ui.tick_rate =
            parse_duration_from_env("SENSEI_ADMIN_TICK_RATE_MS", self.ui.tick_rate)?;

        if let Ok(level) = std::env::var("SENSEI_ADMIN_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(file) = std::env::var("SENSEI_ADMIN_LOG_FILE") {
            self.logging.file = PathBuf::from(file);
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> AdminResult<()> {
        self.api.validate()?;

        if self.list.page_size == 0 {
            return Err(AdminError::ConfigError(
                "list.page_size must be greater than zero".to_string(),
            ));
        }

        if self.ui.tick_rate.is_zero() {
            return Err(AdminError::ConfigError(
                "ui.tick_rate must be non-zero".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(AdminError::ConfigError(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AdminConfig
pub struct AdminConfigBuilder {
    config: AdminConfig,
}

impl AdminConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AdminConfig::default(),
        }
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.api.request_timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.api.retry = retry;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.list.page_size = page_size;
        self
    }

    pub fn tick_rate(mut self, tick_rate: Duration) -> Self {
        self.config.ui.tick_rate = tick_rate;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn log_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config.logging.file = file.into();
        self
    }

    pub fn build(self) -> AdminResult<AdminConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for AdminConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a millisecond duration from `key`, keeping `default` when unset.
pub(crate) fn parse_duration_from_env(key: &str, default: Duration) -> AdminResult<Duration> {
    match std::env::var(key) {
        Ok(val) => parse_millis(key, &val),
        Err(_) => Ok(default),
    }
}

fn parse_millis(key: &str, val: &str) -> AdminResult<Duration> {
    val.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| AdminError::ConfigError(format!("Invalid {}: '{}'", key, val)))
}
