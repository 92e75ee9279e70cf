//! Default configuration values for the admin console

use std::time::Duration;

// Admin API defaults
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5401/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_INITIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5_000;
pub const DEFAULT_RETRY_BACKOFF_MULTIPLIER: f64 = 2.0;

// Listing defaults
pub const DEFAULT_PAGE_SIZE: usize = 5;

// UI defaults
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "sensei-admin.log";

pub fn duration_ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
