//! Environment parsing and validation.
//!
//! Values are read through a lookup function so tests never touch the real
//! process environment.

use std::net::IpAddr;

use storefront_i18n::FallbackPolicy;
use storefront_telemetry::LogFormat;
use tracing::debug;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, MAX_DB_MAX_CONNECTIONS};

/// `PostgreSQL` connection string (required).
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Listener address.
pub const ENV_BIND_ADDR: &str = "STOREFRONT_BIND_ADDR";
/// Listener port.
pub const ENV_HTTP_PORT: &str = "STOREFRONT_HTTP_PORT";
/// Log level directive.
pub const ENV_LOG_LEVEL: &str = "STOREFRONT_LOG_LEVEL";
/// `json` or `pretty`.
pub const ENV_LOG_FORMAT: &str = "STOREFRONT_LOG_FORMAT";
/// Database pool size.
pub const ENV_DB_MAX_CONNECTIONS: &str = "STOREFRONT_DB_MAX_CONNECTIONS";
/// `replace` or `merge`.
pub const ENV_DICTIONARY_FALLBACK: &str = "STOREFRONT_DICTIONARY_FALLBACK";

impl AppConfig {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through `lookup`, applying defaults for unset variables.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `DATABASE_URL` is absent and
    /// [`ConfigError::InvalidField`] when any value fails validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let database_url = read(ENV_DATABASE_URL).ok_or(ConfigError::MissingField {
            field: ENV_DATABASE_URL,
        })?;
        let mut config = Self::with_database_url(parse_database_url(&database_url)?);

        if let Some(value) = read(ENV_BIND_ADDR) {
            config.bind_addr = parse_bind_addr(&value)?;
        }
        if let Some(value) = read(ENV_HTTP_PORT) {
            config.http_port = parse_port(&value)?;
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_FORMAT) {
            config.log_format = LogFormat::parse(&value)
                .ok_or_else(|| ConfigError::invalid(ENV_LOG_FORMAT, &value, "unknown_format"))?;
        }
        if let Some(value) = read(ENV_DB_MAX_CONNECTIONS) {
            config.db_max_connections = parse_pool_size(&value)?;
        }
        if let Some(value) = read(ENV_DICTIONARY_FALLBACK) {
            config.dictionary_fallback = FallbackPolicy::parse(&value).ok_or_else(|| {
                ConfigError::invalid(ENV_DICTIONARY_FALLBACK, &value, "unknown_policy")
            })?;
        }

        debug!(
            bind_addr = %config.bind_addr,
            http_port = config.http_port,
            db_max_connections = config.db_max_connections,
            dictionary_fallback = config.dictionary_fallback.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }
}

fn parse_database_url(value: &str) -> ConfigResult<String> {
    let url = Url::parse(value)
        .map_err(|_| ConfigError::invalid(ENV_DATABASE_URL, "<redacted>", "not_a_url"))?;
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(ConfigError::invalid(
            ENV_DATABASE_URL,
            url.scheme(),
            "unsupported_scheme",
        ));
    }
    Ok(value.to_string())
}

fn parse_bind_addr(value: &str) -> ConfigResult<IpAddr> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid(ENV_BIND_ADDR, value, "not_an_ip_address"))
}

fn parse_port(value: &str) -> ConfigResult<u16> {
    let port: u16 = value
        .parse()
        .map_err(|_| ConfigError::invalid(ENV_HTTP_PORT, value, "out_of_range"))?;
    if port == 0 {
        return Err(ConfigError::invalid(ENV_HTTP_PORT, value, "zero"));
    }
    Ok(port)
}

fn parse_pool_size(value: &str) -> ConfigResult<u32> {
    let size: u32 = value
        .parse()
        .map_err(|_| ConfigError::invalid(ENV_DB_MAX_CONNECTIONS, value, "not_a_number"))?;
    if !(1..=MAX_DB_MAX_CONNECTIONS).contains(&size) {
        return Err(ConfigError::invalid(
            ENV_DB_MAX_CONNECTIONS,
            value,
            "out_of_range",
        ));
    }
    Ok(size)
}
