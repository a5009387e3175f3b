//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Collector registration stays private; callers only see intent-named methods.
//! - Counters cover the HTTP surface, locale redirects, and storefront writes.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder, core::Collector};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    locale_redirects_total: IntCounterVec,
    label_writes_total: IntCounter,
    catalog_writes_total: IntCounterVec,
    dictionary_cache_hits_total: IntCounter,
    dictionary_cache_misses_total: IntCounter,
}

/// Snapshot of the storefront counters for health reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Label upserts accepted.
    pub label_writes_total: u64,
    /// Dictionary lookups served from the cache.
    pub dictionary_cache_hits_total: u64,
    /// Dictionary lookups that reached the label store.
    pub dictionary_cache_misses_total: u64,
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn counter(name: &'static str, help: &str) -> Result<IntCounter> {
    IntCounter::with_opts(Opts::new(name, help))
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}

impl Metrics {
    /// Construct a registry with the storefront collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let locale_redirects_total = counter_vec(
            "locale_redirects_total",
            "Redirects issued by locale resolution",
            &["reason"],
        )?;
        let label_writes_total = counter("label_writes_total", "UI label upserts accepted")?;
        let catalog_writes_total = counter_vec(
            "catalog_writes_total",
            "Admin catalog writes by kind",
            &["kind"],
        )?;
        let dictionary_cache_hits_total = counter(
            "dictionary_cache_hits_total",
            "Dictionary lookups served from the cache",
        )?;
        let dictionary_cache_misses_total = counter(
            "dictionary_cache_misses_total",
            "Dictionary lookups that reached the label store",
        )?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "locale_redirects_total", &locale_redirects_total)?;
        register(&registry, "label_writes_total", &label_writes_total)?;
        register(&registry, "catalog_writes_total", &catalog_writes_total)?;
        register(
            &registry,
            "dictionary_cache_hits_total",
            &dictionary_cache_hits_total,
        )?;
        register(
            &registry,
            "dictionary_cache_misses_total",
            &dictionary_cache_misses_total,
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                locale_redirects_total,
                label_writes_total,
                catalog_writes_total,
                dictionary_cache_hits_total,
                dictionary_cache_misses_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Count a locale redirect; `reason` is `cookie` or `unsupported`.
    pub fn inc_locale_redirect(&self, reason: &str) {
        self.inner
            .locale_redirects_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Count an accepted label upsert.
    pub fn inc_label_write(&self) {
        self.inner.label_writes_total.inc();
    }

    /// Count an admin catalog write such as `product` or `category_translation`.
    pub fn inc_catalog_write(&self, kind: &str) {
        self.inner
            .catalog_writes_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Count a dictionary served from the cache.
    pub fn inc_dictionary_cache_hit(&self) {
        self.inner.dictionary_cache_hits_total.inc();
    }

    /// Count a dictionary loaded from the label store.
    pub fn inc_dictionary_cache_miss(&self) {
        self.inner.dictionary_cache_misses_total.inc();
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the output is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Point-in-time view of the storefront write and cache counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            label_writes_total: self.inner.label_writes_total.get(),
            dictionary_cache_hits_total: self.inner.dictionary_cache_hits_total.get(),
            dictionary_cache_misses_total: self.inner.dictionary_cache_misses_total.get(),
        }
    }
}
