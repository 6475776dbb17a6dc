//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use liveboard_live::{ChannelConfig, LiveMode};

use crate::error::AppError;

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Connection pool size.
    pub database_max_connections: u32,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Which live channel design `/api/events` serves.
    pub live_mode: LiveMode,
    /// Timing and sizing for live channels.
    pub channel: ChannelConfig,
    /// OTLP collector endpoint. `None` disables trace export.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = ChannelConfig::default();

        let live_mode = match get("LIVE_MODE") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("LIVE_MODE: {e}")))?,
            None => LiveMode::default(),
        };

        let channel = ChannelConfig {
            interval: millis_or(&get, "LIVE_INTERVAL_MS", defaults.interval)?,
            initial_delay: millis_or(&get, "LIVE_INITIAL_DELAY_MS", defaults.initial_delay)?,
            heartbeat_cap: parse_or(&get, "LIVE_HEARTBEAT_CAP", defaults.heartbeat_cap)?,
            poll_limit: parse_or(&get, "LIVE_POLL_LIMIT", defaults.poll_limit)?,
            max_lifetime: get("LIVE_MAX_LIFETIME_SECS")
                .map(|raw| parse_value::<u64>("LIVE_MAX_LIFETIME_SECS", &raw))
                .transpose()?
                .map(Duration::from_secs),
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&get, "PORT", 3000)?,
            live_mode,
            channel,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}")))
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    get(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn millis_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, AppError> {
    get(key).map_or(Ok(default), |raw| {
        parse_value::<u64>(key, &raw).map(Duration::from_millis)
    })
}
