//! # Configuration
//!
//! Environment-driven bot configuration. `.env` is loaded by the binary via
//! `dotenvy` before [`Config::from_env`] runs.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.7.0
//!
//! ## Changelog
//! - 2.0.0: Reminder storage paths, poll interval and retry delay
//! - 1.0.0: Initial env-based config

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::features::reminders::scheduler::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_RETRY_DELAY_SECS};

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Register slash commands for this guild only (instant updates during development)
    pub discord_guild_id: Option<u64>,
    pub log_level: String,
    pub reminders_path: PathBuf,
    pub shutdown_marker_path: PathBuf,
    pub reminder_poll_interval: Duration,
    pub reminder_retry_delay: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let discord_token = get("DISCORD_TOKEN").ok_or_else(|| {
            anyhow!("DISCORD_TOKEN is not set. Add it to your environment or .env file.")
        })?;

        let discord_guild_id = get("DISCORD_GUILD_ID")
            .map(|v| parse_number::<u64>("DISCORD_GUILD_ID", &v))
            .transpose()?;

        let log_level = get("LOG_LEVEL")
            .map(|v| v.to_lowercase())
            .unwrap_or_else(|| "info".to_string());

        let reminders_path = get("REMINDERS_FILE")
            .unwrap_or_else(|| "reminders.json".to_string())
            .into();
        let shutdown_marker_path = get("SHUTDOWN_FILE")
            .unwrap_or_else(|| "bot_shutdown.json".to_string())
            .into();

        let poll_secs = get("REMINDER_POLL_SECS")
            .map(|v| parse_number::<u64>("REMINDER_POLL_SECS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(anyhow!("REMINDER_POLL_SECS must be greater than zero"));
        }

        let retry_secs = get("REMINDER_RETRY_SECS")
            .map(|v| parse_number::<i64>("REMINDER_RETRY_SECS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_RETRY_DELAY_SECS);
        if retry_secs <= 0 {
            return Err(anyhow!("REMINDER_RETRY_SECS must be greater than zero"));
        }

        Ok(Config {
            discord_token,
            discord_guild_id,
            log_level,
            reminders_path,
            shutdown_marker_path,
            reminder_poll_interval: Duration::from_secs(poll_secs),
            reminder_retry_delay: chrono::Duration::seconds(retry_secs),
        })
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("Environment variable {key} must be an integer, got {value:?}"))
}
