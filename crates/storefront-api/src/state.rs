//! Shared API state: store handles, metrics, and the dictionary cache.
//!
//! # Design
//! - Every label or catalog write calls [`ApiState::invalidate`], which clears
//!   the cache and bumps the revision served to clients.
//! - A load that races with an invalidation is returned but never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use storefront_catalog::{CatalogService, CatalogStore};
use storefront_i18n::{Dictionary, DictionaryLoader, FallbackPolicy, I18nResult, LabelStore, Locale};
use storefront_telemetry::Metrics;
use tracing::debug;

/// Database reachability check used by `/health`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Succeeds when the backing database answers.
    async fn check(&self) -> anyhow::Result<()>;
}

/// Everything the HTTP surface needs from the outside world.
pub struct ApiDependencies {
    /// Persisted UI labels.
    pub labels: Arc<dyn LabelStore>,
    /// Products and categories.
    pub catalog: Arc<dyn CatalogStore>,
    /// Database reachability check.
    pub health: Arc<dyn HealthProbe>,
    /// Metrics registry.
    pub telemetry: Metrics,
    /// How persisted labels combine with the bundled dictionary.
    pub dictionary_fallback: FallbackPolicy,
}

pub(crate) struct ApiState {
    pub(crate) labels: Arc<dyn LabelStore>,
    pub(crate) catalog: CatalogService,
    pub(crate) health: Arc<dyn HealthProbe>,
    pub(crate) telemetry: Metrics,
    dictionaries: DictionaryLoader,
    cache: RwLock<HashMap<Locale, Arc<Dictionary>>>,
    revision: AtomicU64,
}

impl ApiState {
    pub(crate) fn new(deps: ApiDependencies) -> Self {
        Self {
            dictionaries: DictionaryLoader::new(Arc::clone(&deps.labels), deps.dictionary_fallback),
            labels: deps.labels,
            catalog: CatalogService::new(deps.catalog),
            health: deps.health,
            telemetry: deps.telemetry,
            cache: RwLock::new(HashMap::new()),
            revision: AtomicU64::new(1),
        }
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Dictionary for `locale`, loading it through the label store on a miss.
    pub(crate) async fn dictionary(&self, locale: Locale) -> I18nResult<Arc<Dictionary>> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&locale)
            .cloned();
        if let Some(dictionary) = cached {
            self.telemetry.inc_dictionary_cache_hit();
            return Ok(dictionary);
        }

        self.telemetry.inc_dictionary_cache_miss();
        let revision = self.revision();
        let dictionary = Arc::new(self.dictionaries.load_locale(locale).await?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if self.revision() == revision {
            cache.insert(locale, Arc::clone(&dictionary));
        }
        drop(cache);
        Ok(dictionary)
    }

    /// Drop every cached dictionary and bump the revision.
    pub(crate) fn invalidate(&self, reason: &'static str) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.clear();
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        drop(cache);
        debug!(reason, revision, "dictionary cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryLabels, state_with};
    use storefront_i18n::{LabelRow, static_dictionary};

    #[tokio::test]
    async fn repeated_loads_hit_the_cache() {
        let state = state_with(MemoryLabels::default());
        let first = state.dictionary(Locale::NlBe).await.expect("dictionary");
        let second = state.dictionary(Locale::NlBe).await.expect("dictionary");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.as_ref(), static_dictionary(Locale::NlBe));

        let snapshot = state.telemetry.snapshot();
        assert_eq!(snapshot.dictionary_cache_misses_total, 1);
        assert_eq!(snapshot.dictionary_cache_hits_total, 1);
    }

    #[tokio::test]
    async fn invalidation_reloads_and_bumps_revision() {
        let labels = MemoryLabels::default();
        let state = state_with(labels.clone());
        let before = state.revision();
        let _ = state.dictionary(Locale::EnBe).await.expect("dictionary");

        labels
            .upsert_label(&LabelRow {
                locale: Locale::EnBe,
                namespace: "home".into(),
                key: "title".into(),
                value: "Welcome back".into(),
            })
            .await
            .expect("upsert");
        state.invalidate("label");

        assert_eq!(state.revision(), before + 1);
        let reloaded = state.dictionary(Locale::EnBe).await.expect("dictionary");
        assert_eq!(reloaded["home"]["title"], "Welcome back");
        assert_eq!(state.telemetry.snapshot().dictionary_cache_misses_total, 2);
    }
}
