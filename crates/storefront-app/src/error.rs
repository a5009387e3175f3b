//! # Design
//!
//! - Centralize application-level errors for bootstrap and seeding.
//! - Keep error messages constant while carrying the failing operation.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment configuration was missing or invalid.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: storefront_config::ConfigError,
    },
    /// Logging or metrics setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: storefront_telemetry::TelemetryError,
    },
    /// Database connection, migration, or seeding failed.
    #[error("data operation failed")]
    Data {
        /// Operation identifier.
        operation: &'static str,
        /// Source data error.
        source: storefront_data::DataError,
    },
    /// The HTTP listener failed to bind or stopped unexpectedly.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source server error.
        source: anyhow::Error,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: storefront_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: storefront_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn data(operation: &'static str, source: storefront_data::DataError) -> Self {
        Self::Data { operation, source }
    }

    pub(crate) const fn api_server(operation: &'static str, source: anyhow::Error) -> Self {
        Self::ApiServer { operation, source }
    }

    /// Identifier of the operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Config { operation, .. }
            | Self::Telemetry { operation, .. }
            | Self::Data { operation, .. }
            | Self::ApiServer { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn helpers_build_variants_with_sources() {
        let config = AppError::config(
            "config.load",
            storefront_config::ConfigError::MissingField {
                field: "DATABASE_URL",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.operation(), "config.load");
        assert_eq!(config.to_string(), "configuration operation failed");
        assert!(config.source().is_some());

        let data = AppError::data(
            "seed.run",
            storefront_data::DataError::SeedInvalid {
                product: "Mug".into(),
                category: "Kitchen".into(),
            },
        );
        assert!(matches!(data, AppError::Data { .. }));
        assert_eq!(data.operation(), "seed.run");

        let server = AppError::api_server("api_server.serve", anyhow::anyhow!("address in use"));
        assert_eq!(server.operation(), "api_server.serve");
        assert_eq!(server.to_string(), "api server operation failed");
    }
}
