use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use parrot_core::model::{ReadingSpeed, ScenarioSettings, TierThresholds};

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error(transparent)]
    Settings(#[from] parrot_core::Error),
}

/// Everything the binary reads from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub settings: ScenarioSettings,
    pub retention: Duration,
}

impl Config {
    /// Loads configuration from environment variables (and `.env` outside tests).
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address = var_or("PARROT_BIND_ADDRESS", SocketAddr::from(([0, 0, 0, 0], 8080)))?;
        let database_url = std::env::var("PARROT_DB_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "sqlite://parrot.sqlite3".to_string());

        let defaults = ScenarioSettings::default();
        let settings = ScenarioSettings::new(
            var_or("PARROT_MAX_RETRY", defaults.max_retry())?,
            var_or("PARROT_CONFIRM_INTERVAL", defaults.confirm_interval())?,
            TierThresholds::default(),
            ReadingSpeed::default(),
            var_or("PARROT_RECENCY_DAYS", defaults.recency_days())?,
            var_or("PARROT_MAX_WORDS", defaults.max_words())?,
        )
        .map_err(parrot_core::Error::from)?;

        let retention_days: u32 = var_or("PARROT_RETENTION_DAYS", 7)?;

        Ok(Self {
            bind_address,
            database_url,
            settings,
            retention: Duration::days(i64::from(retention_days)),
        })
    }
}

/// Parses `name` if set, otherwise falls back to `default`.
fn var_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("'{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
