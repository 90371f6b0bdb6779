// src/config.rs
use std::time::Duration;

use crate::error::RelayError;

pub const ENV_USERNAME: &str = "BLUESKY_USERNAME";
pub const ENV_APP_PASSWORD: &str = "BLUESKY_APP_PASSWORD";
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const ENV_INTERVAL_MIN: &str = "NOTIFY_INTERVAL_MIN";

const DEFAULT_INTERVAL_MIN: u64 = 1;

/// Everything the relay needs, resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bluesky account identifier (handle or email).
    pub identifier: String,
    /// App password for the account, never the main password.
    pub app_password: String,
    /// Discord webhook destination.
    pub webhook_url: String,
    /// Delay between watch ticks.
    pub poll_interval: Duration,
}

impl RelayConfig {
    /// Read configuration from the environment. `dotenvy::dotenv()` should
    /// have run first so a local `.env` is picked up.
    pub fn from_env() -> Result<Self, RelayError> {
        Ok(Self {
            identifier: require(ENV_USERNAME)?,
            app_password: require(ENV_APP_PASSWORD)?,
            webhook_url: require(ENV_WEBHOOK_URL)?,
            poll_interval: Duration::from_secs(interval_minutes() * 60),
        })
    }

    pub fn interval_minutes(&self) -> u64 {
        self.poll_interval.as_secs() / 60
    }
}

fn require(name: &str) -> Result<String, RelayError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RelayError::Config(format!("{name} must be set"))),
    }
}

/// Poll interval in minutes; unset, unparsable, or zero falls back to the default.
fn interval_minutes() -> u64 {
    std::env::var(ENV_INTERVAL_MIN)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_INTERVAL_MIN)
}
