use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_api::{ApiDependencies, ApiServer, HealthProbe};
use storefront_config::AppConfig;
use storefront_data::{CatalogRepository, LabelRepository, SeedReport};
use storefront_telemetry::{LoggingConfig, Metrics};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Build identifier baked in at compile time, `dev` otherwise.
const BUILD_SHA: &str = match option_env!("STOREFRONT_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Health probe backed by the shared connection pool.
struct DatabaseProbe {
    pool: PgPool,
}

#[async_trait]
impl HealthProbe for DatabaseProbe {
    async fn check(&self) -> anyhow::Result<()> {
        storefront_data::ping(&self.pool).await?;
        Ok(())
    }
}

fn logging_config(config: &AppConfig) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &config.log_level,
        format: config.log_format,
        build_sha: BUILD_SHA,
    }
}

/// Load configuration, install logging, and open a migrated pool.
async fn prepare(stage: &'static str) -> AppResult<(AppConfig, PgPool)> {
    let config = AppConfig::from_env().map_err(|err| AppError::config("config.load", err))?;
    storefront_telemetry::init_logging(&logging_config(&config))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    info!(stage, build_sha = BUILD_SHA, "storefront starting");

    let pool = storefront_data::connect(&config.database_url, config.db_max_connections)
        .await
        .map_err(|err| AppError::data("database.connect", err))?;
    storefront_data::migrate(&pool)
        .await
        .map_err(|err| AppError::data("database.migrate", err))?;
    Ok((config, pool))
}

fn api_dependencies(config: &AppConfig, pool: &PgPool, telemetry: Metrics) -> ApiDependencies {
    ApiDependencies {
        labels: Arc::new(LabelRepository::new(pool.clone())),
        catalog: Arc::new(CatalogRepository::new(pool.clone())),
        health: Arc::new(DatabaseProbe { pool: pool.clone() }),
        telemetry,
        dictionary_fallback: config.dictionary_fallback,
    }
}

/// Bootstrap the storefront API and block until the listener stops.
///
/// # Errors
///
/// Returns an error if configuration, logging, the database, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let (config, pool) = prepare("api").await?;
    let telemetry =
        Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let api = ApiServer::new(api_dependencies(&config, &pool, telemetry));

    let addr = config.listen_addr();
    info!(
        addr = %addr,
        dictionary_fallback = config.dictionary_fallback.as_str(),
        "Launching API listener"
    );
    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

/// Replace the demo catalog and store the bundled dictionaries.
///
/// # Errors
///
/// Returns an error if configuration, logging, the database, or the seed transaction fails.
pub async fn run_seed() -> AppResult<SeedReport> {
    let (_config, pool) = prepare("seed").await?;
    let report = storefront_data::seed(&pool)
        .await
        .map_err(|err| AppError::data("seed.run", err))?;
    info!(
        categories = report.categories,
        products = report.products,
        translations = report.translations,
        labels = report.labels,
        "seed complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use storefront_i18n::FallbackPolicy;
    use storefront_telemetry::LogFormat;

    #[test]
    fn logging_follows_configuration() {
        let mut config = AppConfig::with_database_url("postgres://localhost/storefront");
        config.log_level = "storefront_api=debug".into();
        config.log_format = LogFormat::Json;
        let logging = logging_config(&config);
        assert_eq!(logging.level, "storefront_api=debug");
        assert_eq!(logging.format, LogFormat::Json);
        assert!(!logging.build_sha.is_empty());
    }

    #[tokio::test]
    async fn unreachable_database_fails_the_health_check() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy("postgres://storefront@127.0.0.1:1/storefront")
            .expect("lazy pool");
        let mut config = AppConfig::with_database_url("postgres://127.0.0.1:1/storefront");
        config.dictionary_fallback = FallbackPolicy::MergePerKey;
        let telemetry = Metrics::new().expect("metrics");
        let deps = api_dependencies(&config, &pool, telemetry);
        assert_eq!(deps.dictionary_fallback, FallbackPolicy::MergePerKey);
        assert!(deps.health.check().await.is_err());
    }
}
