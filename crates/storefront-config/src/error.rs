//! Error types for configuration loading.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable was not set.
    #[error("missing required configuration field")]
    MissingField {
        /// Environment variable name.
        field: &'static str,
    },
    /// A variable was set to a value that failed validation.
    #[error("invalid configuration field")]
    InvalidField {
        /// Environment variable name.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// Name of the variable the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_constant_and_field_is_reported() {
        let missing = ConfigError::MissingField {
            field: "DATABASE_URL",
        };
        assert_eq!(missing.to_string(), "missing required configuration field");
        assert_eq!(missing.field(), "DATABASE_URL");

        let invalid = ConfigError::invalid("STOREFRONT_HTTP_PORT", "0", "zero");
        assert_eq!(invalid.to_string(), "invalid configuration field");
        assert_eq!(invalid.field(), "STOREFRONT_HTTP_PORT");
    }
}
