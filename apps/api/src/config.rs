use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::DEFAULT_TTL;
use crate::ghost_job::reposting::DEFAULT_LOOKBACK_DAYS;

/// Application configuration loaded from environment variables.
/// Only malformed values are errors; every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent → in-memory reposting history and no company directory.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub cache_ttl: Duration,
    pub repost_lookback_days: i64,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            cache_ttl: DEFAULT_TTL,
            repost_lookback_days: DEFAULT_LOOKBACK_DAYS,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            cache_ttl: Duration::from_secs(parse_env(
                "CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            repost_lookback_days: parse_env("REPOST_LOOKBACK_DAYS", defaults.repost_lookback_days)?,
            fetch_timeout: Duration::from_secs(parse_env(
                "FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )?),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
