//! Typed process settings.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use storefront_i18n::FallbackPolicy;
use storefront_telemetry::LogFormat;

/// Default bind address: loopback only.
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
/// Default HTTP port.
pub const DEFAULT_HTTP_PORT: u16 = 3000;
/// Default log level directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default size of the database pool.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
/// Largest accepted database pool.
pub const MAX_DB_MAX_CONNECTIONS: u32 = 100;

/// Settings for the storefront server and the seed tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Address the HTTP listener binds to.
    pub bind_addr: IpAddr,
    /// Port the HTTP listener binds to; never zero.
    pub http_port: u16,
    /// Log level directive handed to the subscriber.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Maximum pooled database connections.
    pub db_max_connections: u32,
    /// How persisted labels combine with the bundled dictionary.
    pub dictionary_fallback: FallbackPolicy,
}

impl AppConfig {
    /// Settings with defaults for everything but the database URL.
    #[must_use]
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            bind_addr: DEFAULT_BIND_ADDR,
            http_port: DEFAULT_HTTP_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::infer(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            dictionary_fallback: FallbackPolicy::default(),
        }
    }

    /// Socket address for the HTTP listener.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}
