//! Admin product list filter state and the pure function that applies it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AdminProduct;
use crate::pagination::total_pages;

/// Ordering of the admin product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Name, A to Z.
    #[default]
    NameAsc,
    /// Name, Z to A.
    NameDesc,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

const DEFAULT_PAGE_SIZE: u32 = 5;

/// Filter, sort, and paging state of the admin product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against the canonical name.
    pub search_query: String,
    /// Restrict to one category.
    pub category_id: Option<Uuid>,
    /// Inclusive lower price bound in cents.
    pub price_min_cents: Option<i64>,
    /// Inclusive upper price bound in cents.
    pub price_max_cents: Option<i64>,
    /// Ordering.
    pub sort_by: SortBy,
    /// One-based page number.
    pub page: u32,
    /// Products per page.
    pub page_size: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            category_id: None,
            price_min_cents: None,
            price_max_cents: None,
            sort_by: SortBy::NameAsc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of filtered products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredPage {
    /// Products on the requested page; empty past the last page.
    pub items: Vec<AdminProduct>,
    /// Products matching the filter across all pages.
    pub total_filtered: usize,
    /// Page count, never below one.
    pub total_pages: u32,
}

impl ProductFilter {
    /// Change the search text and return to the first page.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.page = 1;
    }

    /// Change the category restriction and return to the first page.
    pub const fn set_category(&mut self, category_id: Option<Uuid>) {
        self.category_id = category_id;
        self.page = 1;
    }

    /// Change both price bounds and return to the first page.
    pub const fn set_price_range(&mut self, min_cents: Option<i64>, max_cents: Option<i64>) {
        self.price_min_cents = min_cents;
        self.price_max_cents = max_cents;
        self.page = 1;
    }

    /// Change the ordering and return to the first page.
    pub const fn set_sort_by(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
        self.page = 1;
    }

    /// Jump to `page` keeping every filter.
    pub const fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Restore the defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn matches(&self, product: &AdminProduct, needle: &str) -> bool {
        let canonical = &product.product;
        if !needle.is_empty() && !canonical.name.to_lowercase().contains(needle) {
            return false;
        }
        if self
            .category_id
            .is_some_and(|category_id| canonical.category_id != category_id)
        {
            return false;
        }
        if self
            .price_min_cents
            .is_some_and(|min| canonical.price_cents < min)
        {
            return false;
        }
        !self
            .price_max_cents
            .is_some_and(|max| canonical.price_cents > max)
    }

    fn compare(&self, a: &AdminProduct, b: &AdminProduct) -> Ordering {
        let by_name = || {
            a.product
                .name
                .to_lowercase()
                .cmp(&b.product.name.to_lowercase())
                .then_with(|| a.product.name.cmp(&b.product.name))
        };
        match self.sort_by {
            SortBy::NameAsc => by_name(),
            SortBy::NameDesc => by_name().reverse(),
            SortBy::PriceAsc => a.product.price_cents.cmp(&b.product.price_cents),
            SortBy::PriceDesc => b.product.price_cents.cmp(&a.product.price_cents),
        }
    }

    /// Filter, sort, and slice `products`.
    #[must_use]
    pub fn apply(&self, products: &[AdminProduct]) -> FilteredPage {
        let needle = self.search_query.to_lowercase();
        let mut filtered: Vec<&AdminProduct> = products
            .iter()
            .filter(|product| self.matches(product, &needle))
            .collect();
        filtered.sort_by(|a, b| self.compare(a, b));

        let page_size = self.page_size.max(1);
        let total_filtered = filtered.len();
        let total_pages = total_pages(total_filtered, page_size).max(1);
        let start = (self.page.max(1) as usize - 1).saturating_mul(page_size as usize);
        let items = filtered
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();

        FilteredPage {
            items,
            total_filtered,
            total_pages,
        }
    }
}
