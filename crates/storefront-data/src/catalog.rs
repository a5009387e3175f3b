//! Products, categories, and their translation rows.

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use storefront_catalog::{
    CatalogStore, Category, CategoryTranslation, CategoryTranslationInput, CategoryUpdate,
    CategoryWithTranslations, Product, ProductTranslation, ProductTranslationInput, ProductUpdate,
    ProductWithTranslations, SLUG_TAKEN,
};
use uuid::Uuid;

use crate::error::{Result, query_failed};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price_cents, image, slug, category_id, created_at, updated_at";

const SELECT_CATEGORIES: &str = r"
    SELECT id, name, slug, created_at, updated_at
    FROM categories
    ORDER BY name, id
";

const SELECT_CATEGORY_TRANSLATIONS: &str = r"
    SELECT category_id, language, name
    FROM category_translations
    ORDER BY category_id, language
";

const SELECT_PRODUCT_TRANSLATIONS: &str = r"
    SELECT product_id, language, name, description
    FROM product_translations
    WHERE product_id = ANY($1)
    ORDER BY product_id, language
";

const UPDATE_PRODUCT: &str = r"
    UPDATE products
    SET name = COALESCE($2, name),
        description = CASE WHEN $7 THEN NULL ELSE COALESCE($3, description) END,
        price_cents = COALESCE($4, price_cents),
        image = CASE WHEN $8 THEN NULL ELSE COALESCE($5, image) END,
        category_id = COALESCE($6, category_id),
        updated_at = now()
    WHERE id = $1
    RETURNING id, name, description, price_cents, image, slug, category_id, created_at, updated_at
";

const UPDATE_CATEGORY: &str = r"
    UPDATE categories
    SET name = COALESCE($2, name),
        slug = COALESCE($3, slug),
        updated_at = now()
    WHERE id = $1
    RETURNING id, name, slug, created_at, updated_at
";

const UPSERT_PRODUCT_TRANSLATION: &str = r"
    INSERT INTO product_translations (product_id, language, name, description)
    SELECT $1::uuid, $2::text, $3::text, $4::text
    WHERE EXISTS (SELECT 1 FROM products WHERE id = $1::uuid)
    ON CONFLICT (product_id, language)
    DO UPDATE SET name = EXCLUDED.name, description = EXCLUDED.description
    RETURNING product_id, language, name, description
";

const UPSERT_CATEGORY_TRANSLATION: &str = r"
    INSERT INTO category_translations (category_id, language, name)
    SELECT $1::uuid, $2::text, $3::text
    WHERE EXISTS (SELECT 1 FROM categories WHERE id = $1::uuid)
    ON CONFLICT (category_id, language)
    DO UPDATE SET name = EXCLUDED.name
    RETURNING category_id, language, name
";

#[derive(FromRow)]
struct CategoryRecord {
    id: Uuid,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            slug: record.slug,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CategoryTranslationRecord {
    category_id: Uuid,
    language: String,
    name: String,
}

impl From<CategoryTranslationRecord> for CategoryTranslation {
    fn from(record: CategoryTranslationRecord) -> Self {
        Self {
            category_id: record.category_id,
            language: record.language,
            name: record.name,
        }
    }
}

#[derive(FromRow)]
struct ProductRecord {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    image: Option<String>,
    slug: String,
    category_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price_cents: record.price_cents,
            image: record.image,
            slug: record.slug,
            category_id: record.category_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProductTranslationRecord {
    product_id: Uuid,
    language: String,
    name: String,
    description: Option<String>,
}

impl From<ProductTranslationRecord> for ProductTranslation {
    fn from(record: ProductTranslationRecord) -> Self {
        Self {
            product_id: record.product_id,
            language: record.language,
            name: record.name,
            description: record.description,
        }
    }
}

fn slug_conflict_or(operation: &'static str) -> impl FnOnce(sqlx::Error) -> anyhow::Error {
    move |err| {
        let taken = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if taken {
            SLUG_TAKEN.into()
        } else {
            query_failed(operation)(err).into()
        }
    }
}

/// Database-backed catalog store.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Repository over an already migrated pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Categories with translations, ordered by canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn categories(&self) -> Result<Vec<CategoryWithTranslations>> {
        let categories: Vec<CategoryRecord> = sqlx::query_as(SELECT_CATEGORIES)
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("catalog.categories"))?;
        let translations: Vec<CategoryTranslationRecord> =
            sqlx::query_as(SELECT_CATEGORY_TRANSLATIONS)
                .fetch_all(&self.pool)
                .await
                .map_err(query_failed("catalog.category_translations"))?;

        let mut by_category: HashMap<Uuid, Vec<CategoryTranslation>> = HashMap::new();
        for translation in translations {
            by_category
                .entry(translation.category_id)
                .or_default()
                .push(translation.into());
        }

        Ok(categories
            .into_iter()
            .map(|record| {
                let translations = by_category.remove(&record.id).unwrap_or_default();
                CategoryWithTranslations {
                    category: record.into(),
                    translations,
                }
            })
            .collect())
    }

    async fn fetch_products(
        &self,
        sql: &str,
        operation: &'static str,
        limit: Option<(i64, i64)>,
    ) -> Result<Vec<ProductRecord>> {
        let mut query = sqlx::query_as::<_, ProductRecord>(sql);
        if let Some((limit, offset)) = limit {
            query = query.bind(limit).bind(offset);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed(operation))
    }

    async fn hydrate(&self, records: Vec<ProductRecord>) -> anyhow::Result<Vec<ProductWithTranslations>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
        let translations: Vec<ProductTranslationRecord> =
            sqlx::query_as(SELECT_PRODUCT_TRANSLATIONS)
                .bind(&ids)
                .fetch_all(&self.pool)
                .await
                .map_err(query_failed("catalog.product_translations"))?;
        let mut by_product: HashMap<Uuid, Vec<ProductTranslation>> = HashMap::new();
        for translation in translations {
            by_product
                .entry(translation.product_id)
                .or_default()
                .push(translation.into());
        }

        let categories: HashMap<Uuid, CategoryWithTranslations> = self
            .categories()
            .await?
            .into_iter()
            .map(|category| (category.category.id, category))
            .collect();

        records
            .into_iter()
            .map(|record| {
                let category = categories
                    .get(&record.category_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("product {} references a missing category", record.id))?;
                let translations = by_product.remove(&record.id).unwrap_or_default();
                Ok(ProductWithTranslations {
                    product: record.into(),
                    category,
                    translations,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn list_products(&self) -> anyhow::Result<Vec<ProductWithTranslations>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");
        let records = self.fetch_products(&sql, "catalog.list_products", None).await?;
        self.hydrate(records).await
    }

    async fn count_products(&self) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed("catalog.count_products"))?;
        Ok(u64::try_from(count)?)
    }

    async fn products_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<Vec<ProductWithTranslations>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id LIMIT $1 OFFSET $2"
        );
        let bounds = (i64::try_from(limit)?, i64::try_from(offset)?);
        let records = self
            .fetch_products(&sql, "catalog.products_page", Some(bounds))
            .await?;
        self.hydrate(records).await
    }

    async fn product_by_slug(
        &self,
        slug: &str,
    ) -> anyhow::Result<Option<ProductWithTranslations>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1");
        let record: Option<ProductRecord> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("catalog.product_by_slug"))?;
        let Some(record) = record else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![record]).await?.pop())
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryWithTranslations>> {
        Ok(self.categories().await?)
    }

    async fn update_product(
        &self,
        id: Uuid,
        update: &ProductUpdate,
    ) -> anyhow::Result<Option<Product>> {
        let record: Option<ProductRecord> = sqlx::query_as(UPDATE_PRODUCT)
            .bind(id)
            .bind(update.name.as_deref())
            .bind(update.description.as_deref())
            .bind(update.price_cents)
            .bind(update.image.as_deref())
            .bind(update.category_id)
            .bind(update.clear_description)
            .bind(update.clear_image)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("catalog.update_product"))?;
        Ok(record.map(Product::from))
    }

    async fn update_category(
        &self,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> anyhow::Result<Option<Category>> {
        let record: Option<CategoryRecord> = sqlx::query_as(UPDATE_CATEGORY)
            .bind(id)
            .bind(update.name.as_deref())
            .bind(update.slug.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(slug_conflict_or("catalog.update_category"))?;
        Ok(record.map(Category::from))
    }

    async fn upsert_product_translation(
        &self,
        product_id: Uuid,
        language: &str,
        input: &ProductTranslationInput,
    ) -> anyhow::Result<Option<ProductTranslation>> {
        let record: Option<ProductTranslationRecord> = sqlx::query_as(UPSERT_PRODUCT_TRANSLATION)
            .bind(product_id)
            .bind(language)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("catalog.upsert_product_translation"))?;
        Ok(record.map(ProductTranslation::from))
    }

    async fn upsert_category_translation(
        &self,
        category_id: Uuid,
        language: &str,
        input: &CategoryTranslationInput,
    ) -> anyhow::Result<Option<CategoryTranslation>> {
        let record: Option<CategoryTranslationRecord> =
            sqlx::query_as(UPSERT_CATEGORY_TRANSLATION)
                .bind(category_id)
                .bind(language)
                .bind(&input.name)
                .fetch_optional(&self.pool)
                .await
                .map_err(query_failed("catalog.upsert_category_translation"))?;
        Ok(record.map(CategoryTranslation::from))
    }
}
