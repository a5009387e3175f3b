//! Error types for locale and dictionary operations.

use std::error::Error as StdError;

use thiserror::Error;

/// Primary error type for i18n operations.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The requested locale is not part of the supported registry.
    #[error("unsupported locale")]
    UnsupportedLocale {
        /// Locale identifier supplied by the caller.
        locale: String,
    },
    /// A label write carried an empty namespace or key.
    #[error("invalid label")]
    InvalidLabel {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The label store failed.
    #[error("label store operation failed")]
    Store {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl I18nError {
    /// Wrap a label-store failure with the operation that raised it.
    pub fn store(operation: &'static str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }
}

/// Convenience alias for i18n results.
pub type I18nResult<T> = Result<T, I18nError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_is_constant_and_sources_are_preserved() {
        let unsupported = I18nError::UnsupportedLocale {
            locale: "fr-FR".into(),
        };
        assert_eq!(unsupported.to_string(), "unsupported locale");
        assert!(unsupported.source().is_none());

        let store = I18nError::store("labels.fetch", std::io::Error::other("offline"));
        assert_eq!(store.to_string(), "label store operation failed");
        assert!(store.source().is_some());
    }
}
