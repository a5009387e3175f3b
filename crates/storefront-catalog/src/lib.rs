#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

//! Storage-agnostic catalog types and the pure logic built on them.

pub mod error;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod resolve;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use filter::{FilteredPage, ProductFilter, SortBy};
pub use model::{
    AdminProduct, Category, CategoryTranslation, CategoryTranslationInput, CategoryUpdate,
    CategoryWithTranslations, Product, ProductTranslation, ProductTranslationInput,
    ProductUpdate, ProductWithTranslations, ResolvedCategory, ResolvedProduct,
};
pub use pagination::{
    PageEntry, PageItem, PageLink, PaginationControls, build_page_href, page_window, total_pages,
};
pub use resolve::{resolve_category, resolve_product};
pub use service::{CatalogService, CatalogStore, ProductPage, SLUG_TAKEN};
