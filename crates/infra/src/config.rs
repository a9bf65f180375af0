//! Process configuration, read once from the environment at start-up.

use std::ops::RangeInclusive;

use thiserror::Error;

use shelfwise_auth::TokenConfig;
use shelfwise_auth::config::{MAX_EXPIRATION_MINUTES, MAX_REFRESH_TOKEN_DAYS};
use shelfwise_inventory::StockPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "shelfwise-development-secret-change-me";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// SMTP relay settings. Present only when a host and sender address are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: String,
    pub from_name: String,
    /// Use implicit/STARTTLS relay; `false` talks plain SMTP (local relays only).
    pub tls: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub token: TokenConfig,
    pub smtp: Option<SmtpConfig>,
    /// Without SMTP, log OTP codes instead of failing delivery. Development only.
    pub dev_log_otp: bool,
    pub stock_policy: StockPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = TokenConfig::default();

        let secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let expiration_minutes = parse_in_range(
            &get,
            "JWT_EXPIRATION_MINUTES",
            defaults.expiration_minutes,
            1..=MAX_EXPIRATION_MINUTES,
        )?;
        let token = TokenConfig {
            secret,
            issuer: get("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: get("JWT_AUDIENCE").unwrap_or(defaults.audience),
            expiration_minutes,
            // Zero disables the sliding-expiration headers.
            sliding_expiration_minutes: parse_in_range(
                &get,
                "JWT_SLIDING_EXPIRATION_MINUTES",
                defaults.sliding_expiration_minutes.min(expiration_minutes),
                0..=expiration_minutes,
            )?,
            refresh_token_days: parse_in_range(
                &get,
                "REFRESH_TOKEN_DAYS",
                defaults.refresh_token_days,
                1..=MAX_REFRESH_TOKEN_DAYS,
            )?,
        };

        let smtp = match (get("SMTP_HOST"), get("SMTP_FROM_EMAIL")) {
            (Some(host), Some(from_email)) => Some(SmtpConfig {
                host,
                port: parse_or(&get, "SMTP_PORT", 587)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                from_email,
                from_name: get("SMTP_FROM_NAME").unwrap_or_else(|| "Shelfwise".to_string()),
                tls: parse_bool_or(&get, "SMTP_TLS", true)?,
            }),
            _ => None,
        };

        let stock_policy = if parse_bool_or(&get, "STOCK_ZERO_BACKFILL", true)? {
            StockPolicy::BackfillZeroInStock
        } else {
            StockPolicy::Strict
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: get("DATABASE_URL"),
            token,
            smtp,
            dev_log_otp: parse_bool_or(&get, "DEV_LOG_OTP", false)?,
            stock_policy,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_in_range<G>(
    get: &G,
    key: &'static str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn parse_bool_or<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}
