//! Error types for catalog operations.

use std::error::Error;

use thiserror::Error;
use uuid::Uuid;

/// Primary error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The addressed product or category does not exist.
    #[error("catalog entity not found")]
    NotFound {
        /// Entity kind (`product` or `category`).
        entity: &'static str,
        /// Missing identifier.
        id: Uuid,
    },
    /// A field in an update payload failed validation.
    #[error("invalid catalog field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Translations are only accepted for languages of supported locales.
    #[error("unsupported translation language")]
    UnsupportedLanguage {
        /// Language code supplied by the caller.
        language: String,
    },
    /// The catalog store failed.
    #[error("catalog store operation failed")]
    Store {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl CatalogError {
    pub(crate) fn store(operation: &'static str, source: anyhow::Error) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;
