//! Shared HTTP constants.

pub(crate) const PROBLEM_INTERNAL: &str = "https://storefront.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://storefront.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://storefront.dev/problems/not-found";
pub(crate) const PROBLEM_SERVICE_UNAVAILABLE: &str =
    "https://storefront.dev/problems/service-unavailable";

/// Products per storefront listing page.
pub(crate) const STOREFRONT_PAGE_SIZE: u32 = 3;
/// Products shown on a locale home page.
pub(crate) const FEATURED_PRODUCTS: u64 = 3;
/// Page numbers shown on each side of the current page.
pub(crate) const PAGINATION_SIBLINGS: u32 = 1;

/// Path prefixes the locale middleware leaves alone.
pub(crate) const LOCALE_EXEMPT_PREFIXES: [&str; 4] = ["/admin", "/health", "/metrics", "/locale"];
/// File extensions served as static assets, never locale-prefixed.
pub(crate) const STATIC_ASSET_EXTENSIONS: [&str; 4] = ["svg", "png", "ico", "txt"];
