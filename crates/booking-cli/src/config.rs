use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;

use booking_engine::calendar::parse_timezone;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings resolved once at startup from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the events API, without a trailing slash.
    pub api_url: String,
    /// Timezone used to turn event timestamps into calendar days.
    pub timezone: Tz,
    pub timeout: Duration,
}

impl Config {
    pub fn new(api_url: &str, timezone: &str, timeout_secs: u64) -> Result<Self> {
        let timezone = parse_timezone(timezone).with_context(|| format!("Unknown timezone: {}", timezone))?;
        if timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be at least 1");
        }
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timezone,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
