use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::lifecycle::DEFAULT_IDLE_THRESHOLD_HOURS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub session_idle_hours: u32,
    pub sweep_interval_secs: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            port: parse_var("PORT", 5000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            session_idle_hours: parse_var("SESSION_IDLE_HOURS", DEFAULT_IDLE_THRESHOLD_HOURS)?,
            sweep_interval_secs: non_zero(parse_var("SESSION_SWEEP_INTERVAL_SECS", 3600)?, "SESSION_SWEEP_INTERVAL_SECS")?,
            rate_limit_max_requests: non_zero(parse_var("RATE_LIMIT_MAX_REQUESTS", 100)?, "RATE_LIMIT_MAX_REQUESTS")?,
            rate_limit_window_secs: non_zero(parse_var("RATE_LIMIT_WINDOW_SECS", 900)?, "RATE_LIMIT_WINDOW_SECS")?,
        })
    }

    pub fn idle_threshold(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_idle_hours))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

// Interval timers panic on a zero period
fn non_zero<T: Default + PartialEq>(value: T, name: &str) -> Result<T> {
    if value == T::default() {
        Err(anyhow!("{} must be greater than zero", name))
    } else {
        Ok(value)
    }
}
