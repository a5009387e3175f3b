//! Pick the translation matching a locale's language, else the canonical fields.

use storefront_i18n::Locale;

use crate::model::{
    CategoryWithTranslations, ProductTranslation, ProductWithTranslations, ResolvedCategory,
    ResolvedProduct,
};

/// Localize a category for `locale`.
#[must_use]
pub fn resolve_category(category: &CategoryWithTranslations, locale: Locale) -> ResolvedCategory {
    let name = category
        .translations
        .iter()
        .find(|translation| translation.language == locale.language())
        .map_or_else(
            || category.category.name.clone(),
            |translation| translation.name.clone(),
        );
    ResolvedCategory {
        id: category.category.id,
        name,
        slug: category.category.slug.clone(),
    }
}

/// Localize a product and its category for `locale`.
///
/// A translation without a description keeps the canonical description.
#[must_use]
pub fn resolve_product(product: &ProductWithTranslations, locale: Locale) -> ResolvedProduct {
    let canonical = &product.product;
    let translation: Option<&ProductTranslation> = product
        .translations
        .iter()
        .find(|translation| translation.language == locale.language());

    let (name, description) = match translation {
        Some(translation) => (
            translation.name.clone(),
            translation
                .description
                .clone()
                .or_else(|| canonical.description.clone()),
        ),
        None => (canonical.name.clone(), canonical.description.clone()),
    };

    ResolvedProduct {
        id: canonical.id,
        slug: canonical.slug.clone(),
        name,
        description,
        price_cents: canonical.price_cents,
        image: canonical.image.clone(),
        category: resolve_category(&product.category, locale),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Category, CategoryTranslation, Product};
    use chrono::Utc;
    use uuid::Uuid;

    pub(crate) fn category(name: &str) -> CategoryWithTranslations {
        let now = Utc::now();
        CategoryWithTranslations {
            category: Category {
                id: Uuid::new_v4(),
                name: name.to_string(),
                slug: name.to_lowercase(),
                created_at: now,
                updated_at: now,
            },
            translations: Vec::new(),
        }
    }

    pub(crate) fn product(
        name: &str,
        price_cents: i64,
        category: &CategoryWithTranslations,
    ) -> ProductWithTranslations {
        let now = Utc::now();
        ProductWithTranslations {
            product: Product {
                id: Uuid::new_v4(),
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
            translations: Vec::new(),
        }
    }

    #[test]
    fn category_uses_matching_language() {
        let mut sports = category("Sports");
        sports.translations.push(CategoryTranslation {
            category_id: sports.category.id,
            language: "nl".into(),
            name: "Sport".into(),
        });
        sports.translations.push(CategoryTranslation {
            category_id: sports.category.id,
            language: "hi".into(),
            name: "खेल".into(),
        });

        assert_eq!(resolve_category(&sports, Locale::NlBe).name, "Sport");
        assert_eq!(resolve_category(&sports, Locale::HiIn).name, "खेल");
        assert_eq!(resolve_category(&sports, Locale::EnIn).name, "Sports");
    }

    #[test]
    fn missing_translation_falls_back_to_canonical_fields() {
        let home = category("Home");
        let mug = product("Ceramic Mug", 2499, &home);
        let resolved = resolve_product(&mug, Locale::NlBe);
        assert_eq!(resolved.name, "Ceramic Mug");
        assert_eq!(resolved.description.as_deref(), Some("Ceramic Mug description"));
        assert_eq!(resolved.category.name, "Home");
        assert_eq!(resolved.price_cents, 2499);
    }

    #[test]
    fn translation_without_description_keeps_canonical_description() {
        let home = category("Home");
        let mut mug = product("Ceramic Mug", 2499, &home);
        mug.translations.push(ProductTranslation {
            product_id: mug.product.id,
            language: "nl".into(),
            name: "Keramische Mok".into(),
            description: None,
        });
        mug.translations.push(ProductTranslation {
            product_id: mug.product.id,
            language: "hi".into(),
            name: "सिरेमिक मग".into(),
            description: Some("हस्तनिर्मित".into()),
        });

        let dutch = resolve_product(&mug, Locale::NlBe);
        assert_eq!(dutch.name, "Keramische Mok");
        assert_eq!(dutch.description.as_deref(), Some("Ceramic Mug description"));

        let hindi = resolve_product(&mug, Locale::HiIn);
        assert_eq!(hindi.name, "सिरेमिक मग");
        assert_eq!(hindi.description.as_deref(), Some("हस्तनिर्मित"));
        assert_eq!(hindi.slug, "ceramic-mug");
    }
}
