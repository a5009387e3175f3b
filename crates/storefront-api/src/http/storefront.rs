//! Localized storefront handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use storefront_catalog::{PaginationControls, ResolvedCategory, ResolvedProduct};
use storefront_i18n::{DEFAULT_LOCALE, Locale};
use tracing::debug;

use crate::http::constants::{FEATURED_PRODUCTS, PAGINATION_SIBLINGS, STOREFRONT_PAGE_SIZE};
use crate::http::errors::ApiError;
use crate::models::{
    DictionaryResponse, HomeResponse, LocaleOption, LocaleSelection, ProductListResponse,
};
use crate::state::ApiState;

pub(crate) fn parse_locale(raw: &str) -> Result<Locale, ApiError> {
    Locale::parse(raw).ok_or_else(|| ApiError::not_found(format!("unknown locale '{raw}'")))
}

/// `page` query value; missing, unparsable, or zero means the first page.
fn requested_page(query: &[(String, String)]) -> u32 {
    query
        .iter()
        .find(|(name, _)| name == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

pub(crate) async fn locale_selection() -> Json<LocaleSelection> {
    Json(LocaleSelection {
        default_locale: DEFAULT_LOCALE,
        locales: Locale::all()
            .into_iter()
            .map(|locale| LocaleOption {
                code: locale,
                label: locale.label().to_string(),
            })
            .collect(),
    })
}

pub(crate) async fn home(
    State(state): State<Arc<ApiState>>,
    Path(locale): Path<String>,
) -> Result<Json<HomeResponse>, ApiError> {
    let locale = parse_locale(&locale)?;
    let featured = state.catalog.featured(locale, FEATURED_PRODUCTS).await?;
    Ok(Json(HomeResponse {
        locale,
        revision: state.revision(),
        featured,
    }))
}

pub(crate) async fn dictionary(
    State(state): State<Arc<ApiState>>,
    Path(locale): Path<String>,
) -> Result<Json<DictionaryResponse>, ApiError> {
    let locale = parse_locale(&locale)?;
    let revision = state.revision();
    let dictionary = state.dictionary(locale).await?;
    Ok(Json(DictionaryResponse {
        locale,
        revision,
        dictionary: dictionary.as_ref().clone(),
    }))
}

pub(crate) async fn products(
    State(state): State<Arc<ApiState>>,
    Path(locale): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let locale = parse_locale(&locale)?;
    let requested = requested_page(&query);
    let page = state
        .catalog
        .product_page(locale, requested, STOREFRONT_PAGE_SIZE)
        .await?;
    if page.current_page != requested {
        debug!(
            requested,
            shown = page.current_page,
            "product page clamped"
        );
    }
    let pagination = PaginationControls::build(
        &format!("/{locale}/products"),
        &query,
        page.current_page,
        page.total_pages,
        PAGINATION_SIBLINGS,
    );
    Ok(Json(ProductListResponse {
        locale,
        items: page.items,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_items: page.total_items,
        pagination,
    }))
}

pub(crate) async fn product_detail(
    State(state): State<Arc<ApiState>>,
    Path((locale, slug)): Path<(String, String)>,
) -> Result<Json<ResolvedProduct>, ApiError> {
    let locale = parse_locale(&locale)?;
    state
        .catalog
        .product_by_slug(locale, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("product '{slug}' does not exist")))
}

pub(crate) async fn categories(
    State(state): State<Arc<ApiState>>,
    Path(locale): Path<String>,
) -> Result<Json<Vec<ResolvedCategory>>, ApiError> {
    let locale = parse_locale(&locale)?;
    Ok(Json(state.catalog.categories(locale).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryCatalog, MemoryLabels, state_with, state_with_catalog};
    use axum::http::StatusCode;
    use storefront_catalog::PageItem;

    fn query(pairs: &[(&str, &str)]) -> Query<Vec<(String, String)>> {
        Query(
            pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    #[test]
    fn page_query_defaults_to_first_page() {
        let pairs = |value: &str| vec![("page".to_string(), value.to_string())];
        assert_eq!(requested_page(&[]), 1);
        assert_eq!(requested_page(&pairs("abc")), 1);
        assert_eq!(requested_page(&pairs("0")), 1);
        assert_eq!(requested_page(&pairs("-2")), 1);
        assert_eq!(requested_page(&pairs("4")), 4);
    }

    #[tokio::test]
    async fn selection_lists_every_locale() {
        let Json(selection) = locale_selection().await;
        assert_eq!(selection.default_locale, Locale::EnBe);
        let codes: Vec<_> = selection.locales.iter().map(|option| option.code).collect();
        assert_eq!(codes, Locale::all());
    }

    #[tokio::test]
    async fn home_features_three_localized_products() {
        let state = state_with(MemoryLabels::default());
        let Json(home) = home(State(state), Path("nl-BE".into()))
            .await
            .expect("home");
        assert_eq!(home.featured.len(), 3);
        assert!(home.featured.iter().all(|product| product.name == "Stuk"));
        assert_eq!(home.featured[0].category.name, "Huis");
    }

    #[tokio::test]
    async fn product_listing_clamps_and_builds_controls() {
        let state = state_with_catalog(MemoryCatalog::seeded(7));
        let Json(listing) = products(
            State(state),
            Path("en-BE".into()),
            query(&[("sort", "new"), ("page", "99")]),
        )
        .await
        .expect("listing");
        assert_eq!(listing.current_page, 3);
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.total_items, 7);
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].name, "Item 06");

        let controls = listing.pagination.expect("three pages need controls");
        assert!(controls.next.disabled);
        assert_eq!(
            controls.previous.href.as_deref(),
            Some("/en-BE/products?sort=new&page=2")
        );
        let items: Vec<_> = controls.pages.iter().map(|entry| entry.item).collect();
        assert_eq!(
            items,
            [PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
        assert_eq!(
            controls.pages[0].href.as_deref(),
            Some("/en-BE/products?sort=new")
        );
    }

    #[tokio::test]
    async fn single_page_listing_has_no_controls() {
        let state = state_with_catalog(MemoryCatalog::seeded(2));
        let Json(listing) = products(State(state), Path("hi-IN".into()), query(&[("page", "x")]))
            .await
            .expect("listing");
        assert_eq!(listing.current_page, 1);
        assert!(listing.pagination.is_none());
    }

    #[tokio::test]
    async fn missing_product_is_a_not_found_problem() {
        let state = state_with(MemoryLabels::default());
        let err = product_detail(State(state), Path(("en-IN".into(), "nope".into())))
            .await
            .expect_err("missing product");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn product_detail_resolves_translation() {
        let state = state_with(MemoryLabels::default());
        let Json(product) = product_detail(State(state), Path(("nl-BE".into(), "item-00".into())))
            .await
            .expect("product");
        assert_eq!(product.name, "Stuk");
        assert_eq!(product.description.as_deref(), Some("Item 00 description"));
    }

    #[tokio::test]
    async fn unknown_locale_segment_is_not_found() {
        let state = state_with(MemoryLabels::default());
        let err = categories(State(state), Path("fr-FR".into()))
            .await
            .expect_err("unsupported locale");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dictionary_reports_revision() {
        let state = state_with(MemoryLabels::default());
        let Json(response) = dictionary(State(Arc::clone(&state)), Path("en-BE".into()))
            .await
            .expect("dictionary");
        assert_eq!(response.revision, state.revision());
        assert!(!response.dictionary.is_empty());
    }
}
