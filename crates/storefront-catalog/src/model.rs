//! Catalog entities, their translations, and admin update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical (source-language) category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    pub id: Uuid,
    /// Canonical name.
    pub name: String,
    /// Unique URL slug.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Category name in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    /// Translated category.
    pub category_id: Uuid,
    /// Language code (`nl`, `hi`, ...).
    pub language: String,
    /// Translated name.
    pub name: String,
}

/// Category together with all of its translation rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithTranslations {
    /// Canonical fields.
    #[serde(flatten)]
    pub category: Category,
    /// Translation rows ordered by language.
    pub translations: Vec<CategoryTranslation>,
}

/// Canonical (source-language) product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier.
    pub id: Uuid,
    /// Canonical name.
    pub name: String,
    /// Canonical description.
    pub description: Option<String>,
    /// Price in integer cents.
    pub price_cents: i64,
    /// Image URL.
    pub image: Option<String>,
    /// Unique URL slug.
    pub slug: String,
    /// Owning category.
    pub category_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Product name and description in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTranslation {
    /// Translated product.
    pub product_id: Uuid,
    /// Language code (`nl`, `hi`, ...).
    pub language: String,
    /// Translated name.
    pub name: String,
    /// Translated description; absent means the canonical one applies.
    pub description: Option<String>,
}

/// Product with its category and every translation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWithTranslations {
    /// Canonical fields.
    #[serde(flatten)]
    pub product: Product,
    /// Owning category with its translations.
    pub category: CategoryWithTranslations,
    /// Translation rows ordered by language.
    pub translations: Vec<ProductTranslation>,
}

/// Row shape of the admin product list.
pub type AdminProduct = ProductWithTranslations;

/// Category as shown to a visitor of one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCategory {
    /// Stable identifier.
    pub id: Uuid,
    /// Localized name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// Product as shown to a visitor of one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProduct {
    /// Stable identifier.
    pub id: Uuid,
    /// URL slug.
    pub slug: String,
    /// Localized name.
    pub name: String,
    /// Localized description.
    pub description: Option<String>,
    /// Price in integer cents.
    pub price_cents: i64,
    /// Image URL.
    pub image: Option<String>,
    /// Localized category.
    pub category: ResolvedCategory,
}

/// Partial update of a product's canonical fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductUpdate {
    /// New canonical name.
    pub name: Option<String>,
    /// New canonical description.
    pub description: Option<String>,
    /// New price in integer cents.
    pub price_cents: Option<i64>,
    /// New image URL.
    pub image: Option<String>,
    /// New owning category.
    pub category_id: Option<Uuid>,
    /// Remove the canonical description.
    pub clear_description: bool,
    /// Remove the image URL.
    pub clear_image: bool,
}

impl ProductUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.image.is_none()
            && self.category_id.is_none()
            && !self.clear_description
            && !self.clear_image
    }
}

/// Partial update of a category's canonical fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUpdate {
    /// New canonical name.
    pub name: Option<String>,
    /// New URL slug.
    pub slug: Option<String>,
}

impl CategoryUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }
}

/// Body of a product translation upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTranslationInput {
    /// Translated name.
    pub name: String,
    /// Translated description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a category translation upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTranslationInput {
    /// Translated name.
    pub name: String,
}
