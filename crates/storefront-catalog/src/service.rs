//! Catalog store seam and the service that validates and localizes around it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use storefront_i18n::Locale;
use tracing::info;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{FilteredPage, ProductFilter};
use crate::model::{
    Category, CategoryTranslation, CategoryTranslationInput, CategoryUpdate,
    CategoryWithTranslations, Product, ProductTranslation, ProductTranslationInput,
    ProductUpdate, ProductWithTranslations, ResolvedCategory, ResolvedProduct,
};
use crate::pagination::total_pages;
use crate::resolve::{resolve_category, resolve_product};

/// Persistence seam for catalog data.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every product with category and translations, ordered by canonical name.
    async fn list_products(&self) -> anyhow::Result<Vec<ProductWithTranslations>>;

    /// Number of products.
    async fn count_products(&self) -> anyhow::Result<u64>;

    /// A slice of the product list in canonical name order.
    async fn products_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<Vec<ProductWithTranslations>>;

    /// Product addressed by its slug.
    async fn product_by_slug(&self, slug: &str)
    -> anyhow::Result<Option<ProductWithTranslations>>;

    /// Every category with translations, ordered by canonical name.
    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryWithTranslations>>;

    /// Apply a partial update; `None` when the product does not exist.
    async fn update_product(
        &self,
        id: Uuid,
        update: &ProductUpdate,
    ) -> anyhow::Result<Option<Product>>;

    /// Apply a partial update; `None` when the category does not exist.
    async fn update_category(
        &self,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> anyhow::Result<Option<Category>>;

    /// Create or overwrite a product translation; `None` when the product does not exist.
    async fn upsert_product_translation(
        &self,
        product_id: Uuid,
        language: &str,
        input: &ProductTranslationInput,
    ) -> anyhow::Result<Option<ProductTranslation>>;

    /// Create or overwrite a category translation; `None` when the category does not exist.
    async fn upsert_category_translation(
        &self,
        category_id: Uuid,
        language: &str,
        input: &CategoryTranslationInput,
    ) -> anyhow::Result<Option<CategoryTranslation>>;
}

/// One page of the storefront product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    /// Localized products on this page.
    pub items: Vec<ResolvedProduct>,
    /// Page actually shown after clamping the request.
    pub current_page: u32,
    /// Total page count (`0` for an empty catalog).
    pub total_pages: u32,
    /// Products across all pages.
    pub total_items: u64,
}

/// Validating, localizing facade over a [`CatalogStore`].
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    /// Service backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// The first `limit` products, localized.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Store`] when the store fails.
    pub async fn featured(&self, locale: Locale, limit: u64) -> CatalogResult<Vec<ResolvedProduct>> {
        let products = self
            .store
            .products_page(0, limit)
            .await
            .map_err(|err| CatalogError::store("catalog.featured", err))?;
        Ok(products
            .iter()
            .map(|product| resolve_product(product, locale))
            .collect())
    }

    /// Localized page of products; requests past either end clamp to the nearest page.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Store`] when the store fails.
    pub async fn product_page(
        &self,
        locale: Locale,
        requested_page: u32,
        page_size: u32,
    ) -> CatalogResult<ProductPage> {
        let page_size = page_size.max(1);
        let total_items = self
            .store
            .count_products()
            .await
            .map_err(|err| CatalogError::store("catalog.count", err))?;
        let total = total_pages(usize::try_from(total_items).unwrap_or(usize::MAX), page_size);
        let current_page = requested_page.clamp(1, total.max(1));
        let offset = u64::from(current_page - 1) * u64::from(page_size);
        let products = self
            .store
            .products_page(offset, u64::from(page_size))
            .await
            .map_err(|err| CatalogError::store("catalog.page", err))?;
        Ok(ProductPage {
            items: products
                .iter()
                .map(|product| resolve_product(product, locale))
                .collect(),
            current_page,
            total_pages: total,
            total_items,
        })
    }

    /// Localized product detail.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Store`] when the store fails.
    pub async fn product_by_slug(
        &self,
        locale: Locale,
        slug: &str,
    ) -> CatalogResult<Option<ResolvedProduct>> {
        let product = self
            .store
            .product_by_slug(slug)
            .await
            .map_err(|err| CatalogError::store("catalog.product_by_slug", err))?;
        Ok(product.map(|product| resolve_product(&product, locale)))
    }

    /// Localized category list.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Store`] when the store fails.
    pub async fn categories(&self, locale: Locale) -> CatalogResult<Vec<ResolvedCategory>> {
        Ok(self
            .admin_categories()
            .await?
            .iter()
            .map(|category| resolve_category(category, locale))
            .collect())
    }

    /// Admin product list after applying `filter`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Store`] when the store fails.
    pub async fn admin_products(&self, filter: &ProductFilter) -> CatalogResult<FilteredPage> {
        let products = self
            .store
            .list_products()
            .await
            .map_err(|err| CatalogError::store("catalog.list_products", err))?;
        Ok(filter.apply(&products))
    }

    /// Categories with every translation row.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Store`] when the store fails.
    pub async fn admin_categories(&self) -> CatalogResult<Vec<CategoryWithTranslations>> {
        self.store
            .list_categories()
            .await
            .map_err(|err| CatalogError::store("catalog.list_categories", err))
    }

    /// Update canonical product fields.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidField`] for rejected values, [`CatalogError::NotFound`]
    /// for a missing product or category, [`CatalogError::Store`] on store failure.
    pub async fn update_product(&self, id: Uuid, update: &ProductUpdate) -> CatalogResult<Product> {
        if update.is_empty() {
            return Err(CatalogError::InvalidField {
                field: "body",
                reason: "empty update",
            });
        }
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if update.clear_description && update.description.is_some() {
            return Err(CatalogError::InvalidField {
                field: "description",
                reason: "set and cleared together",
            });
        }
        if update.clear_image && update.image.is_some() {
            return Err(CatalogError::InvalidField {
                field: "image",
                reason: "set and cleared together",
            });
        }
        if update.price_cents.is_some_and(|price| price < 0) {
            return Err(CatalogError::InvalidField {
                field: "price_cents",
                reason: "negative",
            });
        }
        if let Some(category_id) = update.category_id {
            let categories = self.admin_categories().await?;
            if !categories
                .iter()
                .any(|category| category.category.id == category_id)
            {
                return Err(CatalogError::NotFound {
                    entity: "category",
                    id: category_id,
                });
            }
        }

        let product = self
            .store
            .update_product(id, update)
            .await
            .map_err(|err| CatalogError::store("catalog.update_product", err))?
            .ok_or(CatalogError::NotFound {
                entity: "product",
                id,
            })?;
        info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Update canonical category fields.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidField`] for rejected values, [`CatalogError::NotFound`]
    /// for a missing category, [`CatalogError::Store`] on store failure.
    pub async fn update_category(
        &self,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> CatalogResult<Category> {
        if update.is_empty() {
            return Err(CatalogError::InvalidField {
                field: "body",
                reason: "empty update",
            });
        }
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(slug) = &update.slug {
            validate_slug(slug)?;
            let categories = self.admin_categories().await?;
            if categories
                .iter()
                .any(|other| other.category.slug == *slug && other.category.id != id)
            {
                return Err(SLUG_TAKEN);
            }
        }
        // The store may still report a slug taken by a concurrent write.
        let category = self
            .store
            .update_category(id, update)
            .await
            .map_err(|err| match err.downcast::<CatalogError>() {
                Ok(domain) => domain,
                Err(err) => CatalogError::store("catalog.update_category", err),
            })?
            .ok_or(CatalogError::NotFound {
                entity: "category",
                id,
            })?;
        info!(category_id = %id, "category updated");
        Ok(category)
    }

    /// Create or overwrite the `language` translation of a product.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnsupportedLanguage`], [`CatalogError::InvalidField`],
    /// [`CatalogError::NotFound`], or [`CatalogError::Store`].
    pub async fn upsert_product_translation(
        &self,
        product_id: Uuid,
        language: &str,
        input: &ProductTranslationInput,
    ) -> CatalogResult<ProductTranslation> {
        validate_language(language)?;
        require_text("name", &input.name)?;
        let translation = self
            .store
            .upsert_product_translation(product_id, language, input)
            .await
            .map_err(|err| CatalogError::store("catalog.upsert_product_translation", err))?
            .ok_or(CatalogError::NotFound {
                entity: "product",
                id: product_id,
            })?;
        info!(product_id = %product_id, language, "product translation upserted");
        Ok(translation)
    }

    /// Create or overwrite the `language` translation of a category.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnsupportedLanguage`], [`CatalogError::InvalidField`],
    /// [`CatalogError::NotFound`], or [`CatalogError::Store`].
    pub async fn upsert_category_translation(
        &self,
        category_id: Uuid,
        language: &str,
        input: &CategoryTranslationInput,
    ) -> CatalogResult<CategoryTranslation> {
        validate_language(language)?;
        require_text("name", &input.name)?;
        let translation = self
            .store
            .upsert_category_translation(category_id, language, input)
            .await
            .map_err(|err| CatalogError::store("catalog.upsert_category_translation", err))?
            .ok_or(CatalogError::NotFound {
                entity: "category",
                id: category_id,
            })?;
        info!(category_id = %category_id, language, "category translation upserted");
        Ok(translation)
    }
}

fn require_text(field: &'static str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidField {
            field,
            reason: "empty",
        });
    }
    Ok(())
}

/// Rejection for a slug already owned by another category.
pub const SLUG_TAKEN: CatalogError = CatalogError::InvalidField {
    field: "slug",
    reason: "already in use",
};

fn validate_slug(slug: &str) -> CatalogResult<()> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(CatalogError::InvalidField {
            field: "slug",
            reason: "expected lowercase words joined by '-'",
        })
    }
}

fn validate_language(language: &str) -> CatalogResult<()> {
    if Locale::all()
        .iter()
        .any(|locale| locale.language() == language)
    {
        Ok(())
    } else {
        Err(CatalogError::UnsupportedLanguage {
            language: language.to_string(),
        })
    }
}
