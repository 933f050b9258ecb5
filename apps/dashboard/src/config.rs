use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BFF_BASE_URL: &str = "https://bff-analyse.vercel.app";
const DEFAULT_SESSION_TTL_MINUTES: u64 = 480;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bff_base_url: String,
    pub default_store: String,
    pub review_limit: u32,
    pub backlog_limit: u32,
    pub http_timeout: Duration,
    /// Label reviews locally when the BFF analysis has no distribution.
    pub local_sentiment_fallback: bool,
    /// How long a login stays valid, counted from the login itself.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            bff_base_url: env_or("BFF_BASE_URL", DEFAULT_BFF_BASE_URL),
            default_store: env_or("DEFAULT_STORE", "google_play"),
            review_limit: parse_env("REVIEW_LIMIT", 100)?,
            backlog_limit: parse_env("BACKLOG_LIMIT", 100)?,
            http_timeout: Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 30)?),
            local_sentiment_fallback: parse_env("LOCAL_SENTIMENT_FALLBACK", true)?,
            session_ttl: Duration::from_secs(
                parse_env("SESSION_TTL_MINUTES", DEFAULT_SESSION_TTL_MINUTES)?.saturating_mul(60),
            ),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bff_base_url: DEFAULT_BFF_BASE_URL.to_string(),
            default_store: "google_play".to_string(),
            review_limit: 100,
            backlog_limit: 100,
            http_timeout: Duration::from_secs(30),
            local_sentiment_fallback: true,
            session_ttl: Duration::from_secs(60 * DEFAULT_SESSION_TTL_MINUTES),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
