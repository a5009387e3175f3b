//! In-memory stores backing handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use storefront_catalog::{
    CatalogStore, Category, CategoryTranslation, CategoryTranslationInput, CategoryUpdate,
    CategoryWithTranslations, Product, ProductTranslation, ProductTranslationInput, ProductUpdate,
    ProductWithTranslations,
};
use storefront_i18n::{FallbackPolicy, LabelRow, LabelStore, Locale};
use storefront_telemetry::Metrics;
use uuid::Uuid;

use crate::state::{ApiDependencies, ApiState, HealthProbe};

#[derive(Clone, Default)]
pub(crate) struct MemoryLabels {
    rows: Arc<Mutex<Vec<LabelRow>>>,
}

#[async_trait]
impl LabelStore for MemoryLabels {
    async fn labels_for_locale(&self, locale: Locale) -> anyhow::Result<Vec<LabelRow>> {
        let rows = self.rows.lock().expect("labels lock");
        Ok(rows.iter().filter(|row| row.locale == locale).cloned().collect())
    }

    async fn upsert_label(&self, row: &LabelRow) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().expect("labels lock");
        match rows.iter_mut().find(|existing| {
            existing.locale == row.locale
                && existing.namespace == row.namespace
                && existing.key == row.key
        }) {
            Some(existing) => existing.value.clone_from(&row.value),
            None => rows.push(row.clone()),
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryCatalog {
    categories: Arc<Mutex<Vec<CategoryWithTranslations>>>,
    products: Arc<Mutex<Vec<ProductWithTranslations>>>,
}

pub(crate) fn category(name: &str, translations: &[(&str, &str)]) -> CategoryWithTranslations {
    let now = Utc::now();
    let id = Uuid::new_v4();
    CategoryWithTranslations {
        category: Category {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            created_at: now,
            updated_at: now,
        },
        translations: translations
            .iter()
            .map(|(language, name)| CategoryTranslation {
                category_id: id,
                language: (*language).to_string(),
                name: (*name).to_string(),
            })
            .collect(),
    }
}

pub(crate) fn product(
    name: &str,
    price_cents: i64,
    category: &CategoryWithTranslations,
    translations: &[(&str, &str)],
) -> ProductWithTranslations {
    let now = Utc::now();
    let id = Uuid::new_v4();
    ProductWithTranslations {
        product: Product {
            id,
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price_cents,
            image: None,
            slug: name.to_lowercase().replace(' ', "-"),
            category_id: category.category.id,
            created_at: now,
            updated_at: now,
        },
        category: category.clone(),
        translations: translations
            .iter()
            .map(|(language, name)| ProductTranslation {
                product_id: id,
                language: (*language).to_string(),
                name: (*name).to_string(),
                description: None,
            })
            .collect(),
    }
}

impl MemoryCatalog {
    /// Home category with `count` products named `Item 00`, `Item 01`, ...
    pub(crate) fn seeded(count: usize) -> Self {
        let home = category("Home", &[("nl", "Huis")]);
        let products = (0..count)
            .map(|index| product(&format!("Item {index:02}"), 100, &home, &[("nl", "Stuk")]))
            .collect();
        Self {
            categories: Arc::new(Mutex::new(vec![home])),
            products: Arc::new(Mutex::new(products)),
        }
    }

    pub(crate) fn with_category(self, extra: CategoryWithTranslations) -> Self {
        self.categories.lock().expect("categories lock").push(extra);
        self
    }

    pub(crate) fn products(&self) -> Vec<ProductWithTranslations> {
        self.products.lock().expect("products lock").clone()
    }

    pub(crate) fn categories(&self) -> Vec<CategoryWithTranslations> {
        self.categories.lock().expect("categories lock").clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_products(&self) -> anyhow::Result<Vec<ProductWithTranslations>> {
        Ok(self.products())
    }

    async fn count_products(&self) -> anyhow::Result<u64> {
        Ok(self.products().len() as u64)
    }

    async fn products_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<Vec<ProductWithTranslations>> {
        Ok(self
            .products()
            .into_iter()
            .skip(usize::try_from(offset)?)
            .take(usize::try_from(limit)?)
            .collect())
    }

    async fn product_by_slug(
        &self,
        slug: &str,
    ) -> anyhow::Result<Option<ProductWithTranslations>> {
        Ok(self
            .products()
            .into_iter()
            .find(|product| product.product.slug == slug))
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryWithTranslations>> {
        Ok(self.categories())
    }

    async fn update_product(
        &self,
        id: Uuid,
        update: &ProductUpdate,
    ) -> anyhow::Result<Option<Product>> {
        let mut products = self.products.lock().expect("products lock");
        let Some(found) = products.iter_mut().find(|p| p.product.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            found.product.name.clone_from(name);
        }
        if let Some(price) = update.price_cents {
            found.product.price_cents = price;
        }
        if update.clear_description {
            found.product.description = None;
        }
        if update.clear_image {
            found.product.image = None;
        }
        Ok(Some(found.product.clone()))
    }

    async fn update_category(
        &self,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> anyhow::Result<Option<Category>> {
        let mut categories = self.categories.lock().expect("categories lock");
        let Some(found) = categories.iter_mut().find(|c| c.category.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            found.category.name.clone_from(name);
        }
        if let Some(slug) = &update.slug {
            found.category.slug.clone_from(slug);
        }
        Ok(Some(found.category.clone()))
    }

    async fn upsert_product_translation(
        &self,
        product_id: Uuid,
        language: &str,
        input: &ProductTranslationInput,
    ) -> anyhow::Result<Option<ProductTranslation>> {
        let mut products = self.products.lock().expect("products lock");
        let Some(found) = products.iter_mut().find(|p| p.product.id == product_id) else {
            return Ok(None);
        };
        let translation = ProductTranslation {
            product_id,
            language: language.to_string(),
            name: input.name.clone(),
            description: input.description.clone(),
        };
        found.translations.retain(|t| t.language != language);
        found.translations.push(translation.clone());
        Ok(Some(translation))
    }

    async fn upsert_category_translation(
        &self,
        category_id: Uuid,
        language: &str,
        input: &CategoryTranslationInput,
    ) -> anyhow::Result<Option<CategoryTranslation>> {
        let mut categories = self.categories.lock().expect("categories lock");
        let Some(found) = categories.iter_mut().find(|c| c.category.id == category_id) else {
            return Ok(None);
        };
        let translation = CategoryTranslation {
            category_id,
            language: language.to_string(),
            name: input.name.clone(),
        };
        found.translations.retain(|t| t.language != language);
        found.translations.push(translation.clone());
        Ok(Some(translation))
    }
}

pub(crate) struct StaticProbe {
    pub(crate) healthy: bool,
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn check(&self) -> anyhow::Result<()> {
        if self.healthy {
            Ok(())
        } else {
            anyhow::bail!("connection refused")
        }
    }
}

pub(crate) fn dependencies(labels: MemoryLabels, catalog: MemoryCatalog) -> ApiDependencies {
    ApiDependencies {
        labels: Arc::new(labels),
        catalog: Arc::new(catalog),
        health: Arc::new(StaticProbe { healthy: true }),
        telemetry: Metrics::new().expect("metrics registry"),
        dictionary_fallback: FallbackPolicy::Replace,
    }
}

pub(crate) fn state_with(labels: MemoryLabels) -> Arc<ApiState> {
    Arc::new(ApiState::new(dependencies(labels, MemoryCatalog::seeded(7))))
}

pub(crate) fn state_with_catalog(catalog: MemoryCatalog) -> Arc<ApiState> {
    Arc::new(ApiState::new(dependencies(MemoryLabels::default(), catalog)))
}
