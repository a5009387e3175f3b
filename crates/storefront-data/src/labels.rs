//! `ui_labels` repository backing the dictionary loader and admin editor.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use storefront_i18n::{LabelRow, LabelStore, Locale};
use tracing::debug;

use crate::error::{Result, query_failed};

const SELECT_LABELS: &str = r"
    SELECT namespace, key, value
    FROM ui_labels
    WHERE locale = $1
";

const UPSERT_LABEL: &str = r"
    INSERT INTO ui_labels (locale, namespace, key, value)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (locale, namespace, key)
    DO UPDATE SET value = EXCLUDED.value, updated_at = now()
";

#[derive(FromRow)]
struct LabelRecord {
    namespace: String,
    key: String,
    value: String,
}

/// Database-backed label store.
#[derive(Clone)]
pub struct LabelRepository {
    pool: PgPool,
}

impl LabelRepository {
    /// Repository over an already migrated pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rows stored for `locale`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn fetch(&self, locale: Locale) -> Result<Vec<LabelRow>> {
        let records: Vec<LabelRecord> = sqlx::query_as(SELECT_LABELS)
            .bind(locale.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("labels.fetch"))?;
        debug!(locale = %locale, rows = records.len(), "labels fetched");
        Ok(records
            .into_iter()
            .map(|record| LabelRow {
                locale,
                namespace: record.namespace,
                key: record.key,
                value: record.value,
            })
            .collect())
    }

    /// Insert or overwrite one label.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn upsert(&self, row: &LabelRow) -> Result<()> {
        sqlx::query(UPSERT_LABEL)
            .bind(row.locale.as_str())
            .bind(&row.namespace)
            .bind(&row.key)
            .bind(&row.value)
            .execute(&self.pool)
            .await
            .map_err(query_failed("labels.upsert"))?;
        Ok(())
    }
}

#[async_trait]
impl LabelStore for LabelRepository {
    async fn labels_for_locale(&self, locale: Locale) -> anyhow::Result<Vec<LabelRow>> {
        Ok(self.fetch(locale).await?)
    }

    async fn upsert_label(&self, row: &LabelRow) -> anyhow::Result<()> {
        Ok(self.upsert(row).await?)
    }
}
