//! Transactional seeding of the demo catalog and the bundled UI labels.
//!
//! Everything runs in one transaction: any failure leaves the database untouched.

use std::collections::HashMap;

use sqlx::PgPool;
use storefront_i18n::{Locale, dictionary_rows, static_dictionary};
use tracing::info;
use uuid::Uuid;

use crate::error::{DataError, Result, query_failed};

/// A category to seed with its translated names.
#[derive(Debug, Clone)]
pub struct SeedCategory {
    /// Canonical name.
    pub name: &'static str,
    /// URL slug.
    pub slug: &'static str,
    /// `(language, name)` pairs.
    pub translations: &'static [(&'static str, &'static str)],
}

/// A product translation to seed.
#[derive(Debug, Clone)]
pub struct SeedProductTranslation {
    /// Language code.
    pub language: &'static str,
    /// Translated name.
    pub name: &'static str,
    /// Translated description.
    pub description: &'static str,
}

/// A product to seed, referencing its category by canonical name.
#[derive(Debug, Clone)]
pub struct SeedProduct {
    /// Canonical name; the slug is derived from it.
    pub name: &'static str,
    /// Canonical description.
    pub description: &'static str,
    /// Price in integer cents.
    pub price_cents: i64,
    /// Image URL.
    pub image: &'static str,
    /// Canonical name of the owning category.
    pub category: &'static str,
    /// Translations.
    pub translations: &'static [SeedProductTranslation],
}

/// Catalog content written by a seed run.
#[derive(Debug, Clone)]
pub struct SeedData {
    /// Categories.
    pub categories: Vec<SeedCategory>,
    /// Products.
    pub products: Vec<SeedProduct>,
}

/// Counts of rows written by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Categories inserted.
    pub categories: usize,
    /// Products inserted.
    pub products: usize,
    /// Category and product translations inserted.
    pub translations: usize,
    /// Bundled labels newly written to the label store.
    pub labels: u64,
}

const DEMO_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Electronics",
        slug: "electronics",
        translations: &[("nl", "Elektronica"), ("hi", "इलेक्ट्रॉनिक्स")],
    },
    SeedCategory {
        name: "Sports",
        slug: "sports",
        translations: &[("nl", "Sport"), ("hi", "खेल")],
    },
    SeedCategory {
        name: "Home",
        slug: "home",
        translations: &[("nl", "Huis"), ("hi", "घर")],
    },
    SeedCategory {
        name: "Fashion",
        slug: "fashion",
        translations: &[("nl", "Mode"), ("hi", "फैशन")],
    },
];

const DEMO_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Wireless Headphones",
        description: "Premium noise-cancelling wireless headphones with long battery life.",
        price_cents: 19_999,
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
        category: "Electronics",
        translations: &[
            SeedProductTranslation {
                language: "nl",
                name: "Draadloze Koptelefoon",
                description: "Premium ruisonderdrukkende draadloze koptelefoon met lange batterijduur.",
            },
            SeedProductTranslation {
                language: "hi",
                name: "वायरलेस हेडफ़ोन",
                description: "लंबी बैटरी लाइफ वाले प्रीमियम नॉइज़-कैंसलिंग वायरलेस हेडफ़ोन।",
            },
        ],
    },
    SeedProduct {
        name: "Smart Watch",
        description: "Fitness tracker with heart rate monitoring and sleep analysis.",
        price_cents: 14_999,
        image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30",
        category: "Electronics",
        translations: &[
            SeedProductTranslation {
                language: "nl",
                name: "Slimme Horloge",
                description: "Fitnesstracker met hartslagmeting en slaapanalyse.",
            },
            SeedProductTranslation {
                language: "hi",
                name: "स्मार्ट वॉच",
                description: "हृदय गति निगरानी और नींद विश्लेषण के साथ फिटनेस ट्रैकर।",
            },
        ],
    },
    SeedProduct {
        name: "Running Shoes",
        description: "Lightweight running shoes with responsive cushioning.",
        price_cents: 8_999,
        image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff",
        category: "Sports",
        translations: &[
            SeedProductTranslation {
                language: "nl",
                name: "Hardloopschoenen",
                description: "Lichte hardloopschoenen met responsieve demping.",
            },
            SeedProductTranslation {
                language: "hi",
                name: "रनिंग शूज़",
                description: "रिस्पॉन्सिव कुशनिंग वाले हल्के रनिंग शूज़।",
            },
        ],
    },
    SeedProduct {
        name: "Ceramic Mug",
        description: "Handcrafted ceramic mug with minimalist design.",
        price_cents: 2_499,
        image: "https://images.unsplash.com/photo-1514228742587-6b1558fcca3d",
        category: "Home",
        translations: &[
            SeedProductTranslation {
                language: "nl",
                name: "Keramische Mok",
                description: "Handgemaakt keramisch mok met minimalistisch ontwerp.",
            },
            SeedProductTranslation {
                language: "hi",
                name: "सिरेमिक मग",
                description: "न्यूनतम डिज़ाइन वाला हस्तनिर्मित सिरेमिक मग।",
            },
        ],
    },
    SeedProduct {
        name: "Leather Backpack",
        description: "Durable leather backpack with multiple compartments.",
        price_cents: 7_999,
        image: "https://images.unsplash.com/photo-1491637639811-60e2756cc1c7",
        category: "Fashion",
        translations: &[
            SeedProductTranslation {
                language: "nl",
                name: "Leren Rugzak",
                description: "Duurzame leren rugzak met meerdere compartimenten.",
            },
            SeedProductTranslation {
                language: "hi",
                name: "लेदर बैकपैक",
                description: "कई कम्पार्टमेंट वाला टिकाऊ लेदर बैकपैक।",
            },
        ],
    },
];

impl Default for SeedData {
    fn default() -> Self {
        Self {
            categories: DEMO_CATEGORIES.to_vec(),
            products: DEMO_PRODUCTS.to_vec(),
        }
    }
}

/// Slug derived from a product name: lowercase, spaces replaced by `-`.
#[must_use]
pub fn product_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Map every product to the id of its category.
///
/// # Errors
///
/// Returns [`DataError::SeedInvalid`] for the first product whose category is unknown.
pub fn category_ids_for(
    products: &[SeedProduct],
    category_ids: &HashMap<&str, Uuid>,
) -> Result<Vec<Uuid>> {
    products
        .iter()
        .map(|product| {
            category_ids
                .get(product.category)
                .copied()
                .ok_or_else(|| DataError::SeedInvalid {
                    product: product.name.to_string(),
                    category: product.category.to_string(),
                })
        })
        .collect()
}

/// Replace the catalog with the demo content and load bundled labels.
///
/// # Errors
///
/// See [`seed_with`].
pub async fn seed(pool: &PgPool) -> Result<SeedReport> {
    seed_with(pool, &SeedData::default()).await
}

/// Replace the catalog with `data` and load bundled labels, atomically.
///
/// Existing labels are kept so operator edits survive a reseed.
///
/// # Errors
///
/// Returns [`DataError::SeedInvalid`] when a product names an unknown category
/// and [`DataError::QueryFailed`] when a statement fails. Nothing is written in
/// either case.
pub async fn seed_with(pool: &PgPool, data: &SeedData) -> Result<SeedReport> {
    let mut tx = pool.begin().await.map_err(query_failed("seed.begin"))?;
    let mut report = SeedReport::default();

    for table in [
        "product_translations",
        "category_translations",
        "products",
        "categories",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await
            .map_err(query_failed("seed.clear"))?;
    }

    let mut category_ids: HashMap<&str, Uuid> = HashMap::new();
    for category in &data.categories {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO categories (id, name, slug) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(category.name)
            .bind(category.slug)
            .execute(&mut *tx)
            .await
            .map_err(query_failed("seed.insert_category"))?;
        for (language, name) in category.translations {
            sqlx::query(
                "INSERT INTO category_translations (category_id, language, name) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(*language)
            .bind(*name)
            .execute(&mut *tx)
            .await
            .map_err(query_failed("seed.insert_category_translation"))?;
            report.translations += 1;
        }
        category_ids.insert(category.name, id);
        report.categories += 1;
    }

    let owners = category_ids_for(&data.products, &category_ids)?;
    for (product, category_id) in data.products.iter().zip(owners) {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO products (id, name, description, price_cents, image, slug, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.price_cents)
        .bind(product.image)
        .bind(product_slug(product.name))
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(query_failed("seed.insert_product"))?;
        for translation in product.translations {
            sqlx::query(
                "INSERT INTO product_translations (product_id, language, name, description) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(translation.language)
            .bind(translation.name)
            .bind(translation.description)
            .execute(&mut *tx)
            .await
            .map_err(query_failed("seed.insert_product_translation"))?;
            report.translations += 1;
        }
        report.products += 1;
    }

    for locale in Locale::all() {
        for row in dictionary_rows(locale, static_dictionary(locale)) {
            let written = sqlx::query(
                "INSERT INTO ui_labels (locale, namespace, key, value) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (locale, namespace, key) DO NOTHING",
            )
            .bind(row.locale.as_str())
            .bind(&row.namespace)
            .bind(&row.key)
            .bind(&row.value)
            .execute(&mut *tx)
            .await
            .map_err(query_failed("seed.insert_label"))?;
            report.labels += written.rows_affected();
        }
    }

    tx.commit().await.map_err(query_failed("seed.commit"))?;
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

    #[test]
    fn slugs_follow_product_names() {
        assert_eq!(product_slug("Wireless Headphones"), "wireless-headphones");
        assert_eq!(product_slug("Ceramic Mug"), "ceramic-mug");
    }

    #[test]
    fn demo_data_is_consistent() {
        let data = SeedData::default();
        assert_eq!(data.categories.len(), 4);
        assert_eq!(data.products.len(), 5);
        let ids: HashMap<&str, Uuid> = data
            .categories
            .iter()
            .map(|category| (category.name, Uuid::new_v4()))
            .collect();
        let owners = category_ids_for(&data.products, &ids).expect("every category exists");
        assert_eq!(owners.len(), 5);
        assert!(
            data.products
                .iter()
                .all(|product| product.translations.len() == 2)
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut data = SeedData::default();
        data.products[0].category = "Garden";
        let ids: HashMap<&str, Uuid> = data
            .categories
            .iter()
            .map(|category| (category.name, Uuid::new_v4()))
            .collect();
        let err = category_ids_for(&data.products, &ids).expect_err("garden is missing");
        assert!(matches!(
            err,
            DataError::SeedInvalid { ref category, .. } if category == "Garden"
        ));
    }
}
