#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

//! PostgreSQL persistence for the storefront: migrations, repositories, and seeding.

pub mod catalog;
pub mod error;
pub mod labels;
pub mod seed;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use catalog::CatalogRepository;
pub use error::{DataError, Result as DataResult};
pub use labels::LabelRepository;
pub use seed::{SeedData, SeedReport, seed, seed_with};

/// Open a connection pool against `database_url`.
///
/// # Errors
///
/// Returns [`DataError::ConnectFailed`] when the database is unreachable.
pub async fn connect(database_url: &str, max_connections: u32) -> DataResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|source| DataError::ConnectFailed { source })
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns [`DataError::MigrationFailed`] when a migration cannot be applied.
pub async fn migrate(pool: &PgPool) -> DataResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|source| DataError::MigrationFailed { source })?;
    tracing::info!("database migrations applied");
    Ok(())
}

/// Cheap liveness probe used by the health endpoint.
///
/// # Errors
///
/// Returns [`DataError::QueryFailed`] when the database does not answer.
pub async fn ping(pool: &PgPool) -> DataResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|source| DataError::QueryFailed {
            operation: "ping",
            source,
        })
}
