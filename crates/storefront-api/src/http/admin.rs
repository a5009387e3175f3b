//! Label and catalog administration handlers.
//!
//! Every successful write invalidates the dictionary cache so visitors see the
//! change on their next request.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use storefront_catalog::{
    Category, CategoryTranslation, CategoryTranslationInput, CategoryUpdate,
    CategoryWithTranslations, FilteredPage, Product, ProductFilter, ProductTranslation,
    ProductTranslationInput, ProductUpdate,
};
use storefront_i18n::{
    DEFAULT_LOCALE, I18nError, LabelRow, Locale, get_labels_for_locale, upsert_label,
};
use tracing::info;
use uuid::Uuid;

use crate::http::errors::ApiError;
use crate::models::{LabelUpsertRequest, LabelsQuery, LabelsResponse};
use crate::state::ApiState;

pub(crate) async fn list_labels(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LabelsQuery>,
) -> Result<Json<LabelsResponse>, ApiError> {
    let raw = query.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let locale =
        Locale::parse(&raw).ok_or(I18nError::UnsupportedLocale { locale: raw.clone() })?;
    let namespaces = get_labels_for_locale(state.labels.as_ref(), locale.as_str()).await?;
    Ok(Json(LabelsResponse { locale, namespaces }))
}

pub(crate) async fn put_label(
    State(state): State<Arc<ApiState>>,
    Path((locale, namespace, key)): Path<(String, String, String)>,
    Json(body): Json<LabelUpsertRequest>,
) -> Result<Json<LabelRow>, ApiError> {
    let row = upsert_label(state.labels.as_ref(), &locale, &namespace, &key, &body.value).await?;
    state.telemetry.inc_label_write();
    state.invalidate("label");
    info!(
        locale = %row.locale,
        namespace = %row.namespace,
        key = %row.key,
        "label saved"
    );
    Ok(Json(row))
}

pub(crate) async fn list_products(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<FilteredPage>, ApiError> {
    Ok(Json(state.catalog.admin_products(&filter).await?))
}

pub(crate) async fn patch_product(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let product = state.catalog.update_product(id, &update).await?;
    record_catalog_write(&state, "product");
    Ok(Json(product))
}

pub(crate) async fn put_product_translation(
    State(state): State<Arc<ApiState>>,
    Path((id, language)): Path<(Uuid, String)>,
    Json(input): Json<ProductTranslationInput>,
) -> Result<Json<ProductTranslation>, ApiError> {
    let translation = state
        .catalog
        .upsert_product_translation(id, &language, &input)
        .await?;
    record_catalog_write(&state, "product_translation");
    Ok(Json(translation))
}

pub(crate) async fn list_categories(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<CategoryWithTranslations>>, ApiError> {
    Ok(Json(state.catalog.admin_categories().await?))
}

pub(crate) async fn patch_category(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<CategoryUpdate>,
) -> Result<Json<Category>, ApiError> {
    let category = state.catalog.update_category(id, &update).await?;
    record_catalog_write(&state, "category");
    Ok(Json(category))
}

pub(crate) async fn put_category_translation(
    State(state): State<Arc<ApiState>>,
    Path((id, language)): Path<(Uuid, String)>,
    Json(input): Json<CategoryTranslationInput>,
) -> Result<Json<CategoryTranslation>, ApiError> {
    let translation = state
        .catalog
        .upsert_category_translation(id, &language, &input)
        .await?;
    record_catalog_write(&state, "category_translation");
    Ok(Json(translation))
}

fn record_catalog_write(state: &ApiState, kind: &'static str) {
    state.telemetry.inc_catalog_write(kind);
    state.invalidate(kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        MemoryCatalog, MemoryLabels, category, state_with, state_with_catalog,
    };
    use axum::http::StatusCode;

    #[tokio::test]
    async fn label_upsert_overwrites_and_invalidates() {
        let state = state_with(MemoryLabels::default());
        let before = state.revision();
        for value in ["Shop now", "Buy now"] {
            let _ = put_label(
                State(Arc::clone(&state)),
                Path(("en-BE".into(), "home".into(), "cta".into())),
                Json(LabelUpsertRequest {
                    value: value.into(),
                }),
            )
            .await
            .expect("label saved");
        }
        assert_eq!(state.revision(), before + 2);
        assert_eq!(state.telemetry.snapshot().label_writes_total, 2);

        let Json(listed) = list_labels(
            State(Arc::clone(&state)),
            Query(LabelsQuery { locale: None }),
        )
        .await
        .expect("labels");
        assert_eq!(listed.locale, Locale::EnBe);
        assert_eq!(listed.namespaces["home"].len(), 1);
        assert_eq!(listed.namespaces["home"][0].value, "Buy now");

        let dictionary = state.dictionary(Locale::EnBe).await.expect("dictionary");
        assert_eq!(dictionary["home"]["cta"], "Buy now");
    }

    #[tokio::test]
    async fn label_validation_failures_are_bad_requests() {
        let state = state_with(MemoryLabels::default());
        let err = put_label(
            State(Arc::clone(&state)),
            Path(("en-BE".into(), "  ".into(), "cta".into())),
            Json(LabelUpsertRequest { value: "x".into() }),
        )
        .await
        .expect_err("blank namespace");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = list_labels(
            State(Arc::clone(&state)),
            Query(LabelsQuery {
                locale: Some("fr-FR".into()),
            }),
        )
        .await
        .expect_err("unsupported locale");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(state.telemetry.snapshot().label_writes_total, 0);
    }

    #[tokio::test]
    async fn product_updates_validate_and_invalidate() {
        let catalog = MemoryCatalog::seeded(3);
        let id = catalog.products()[0].product.id;
        let state = state_with_catalog(catalog);
        let before = state.revision();

        let Json(updated) = patch_product(
            State(Arc::clone(&state)),
            Path(id),
            Json(ProductUpdate {
                price_cents: Some(2_500),
                ..ProductUpdate::default()
            }),
        )
        .await
        .expect("update");
        assert_eq!(updated.price_cents, 2_500);
        assert_eq!(state.revision(), before + 1);

        let err = patch_product(
            State(Arc::clone(&state)),
            Path(id),
            Json(ProductUpdate {
                price_cents: Some(-1),
                ..ProductUpdate::default()
            }),
        )
        .await
        .expect_err("negative price");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = patch_product(
            State(Arc::clone(&state)),
            Path(Uuid::new_v4()),
            Json(ProductUpdate {
                name: Some("Ghost".into()),
                ..ProductUpdate::default()
            }),
        )
        .await
        .expect_err("missing product");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(state.revision(), before + 1);
    }

    #[tokio::test]
    async fn translation_upserts_reject_unknown_languages() {
        let catalog = MemoryCatalog::seeded(1);
        let product_id = catalog.products()[0].product.id;
        let category_id = catalog.categories()[0].category.id;
        let state = state_with_catalog(catalog);

        let Json(saved) = put_product_translation(
            State(Arc::clone(&state)),
            Path((product_id, "hi".into())),
            Json(ProductTranslationInput {
                name: "वस्तु".into(),
                description: None,
            }),
        )
        .await
        .expect("translation");
        assert_eq!(saved.language, "hi");

        let err = put_category_translation(
            State(Arc::clone(&state)),
            Path((category_id, "fr".into())),
            Json(CategoryTranslationInput {
                name: "Maison".into(),
            }),
        )
        .await
        .expect_err("unsupported language");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn category_patch_and_listing() {
        let catalog = MemoryCatalog::seeded(1);
        let category_id = catalog.categories()[0].category.id;
        let state = state_with_catalog(catalog);

        let Json(category) = patch_category(
            State(Arc::clone(&state)),
            Path(category_id),
            Json(CategoryUpdate {
                slug: Some("living".into()),
                ..CategoryUpdate::default()
            }),
        )
        .await
        .expect("category update");
        assert_eq!(category.slug, "living");

        let Json(categories) = list_categories(State(Arc::clone(&state)))
            .await
            .expect("categories");
        assert_eq!(categories[0].category.slug, "living");
        assert_eq!(state.telemetry.snapshot().label_writes_total, 0);
    }

    #[tokio::test]
    async fn duplicate_category_slug_is_a_bad_request() {
        let catalog = MemoryCatalog::seeded(0).with_category(category("Garden", &[]));
        let garden_id = catalog.categories()[1].category.id;
        let state = state_with_catalog(catalog);
        let before = state.revision();

        let err = patch_category(
            State(Arc::clone(&state)),
            Path(garden_id),
            Json(CategoryUpdate {
                slug: Some("home".into()),
                ..CategoryUpdate::default()
            }),
        )
        .await
        .expect_err("slug taken");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let params = err.invalid_params.expect("invalid params");
        assert_eq!(params[0].pointer, "/slug");
        assert_eq!(params[0].message, "already in use");
        assert_eq!(state.revision(), before);
    }

    #[tokio::test]
    async fn admin_product_list_applies_filter() {
        let state = state_with_catalog(MemoryCatalog::seeded(7));
        let mut filter = ProductFilter::default();
        filter.set_search_query("item 0");
        filter.set_page(2);
        let Json(page) = list_products(State(state), Query(filter))
            .await
            .expect("filtered");
        assert_eq!(page.total_filtered, 7);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
    }
}
