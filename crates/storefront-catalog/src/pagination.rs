//! Page-number windowing and pagination link construction.
//!
//! # Design
//!
//! - The window always starts at page 1 and ends at the last page; the
//!   neighbourhood of the current page is shown with at most one ellipsis per side.
//! - Arithmetic saturates so out-of-range pages never panic.
//! - The first page has a canonical URL without a `page` parameter.

use serde::Serialize;
use url::form_urlencoded;

const PAGE_PARAM: &str = "page";

/// One slot in a rendered page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageItem {
    /// A numbered page.
    Page(u32),
    /// Elided run of pages.
    Ellipsis,
}

/// Page numbers and ellipsis markers to render for `current` of `total`.
#[must_use]
pub fn page_window(current: u32, total: u32, siblings: u32) -> Vec<PageItem> {
    let slots = siblings.saturating_mul(2).saturating_add(5);
    if total <= slots {
        return (1..=total).map(PageItem::Page).collect();
    }

    let left = current.saturating_sub(siblings).max(1);
    let right = current.saturating_add(siblings).min(total);

    let mut items = vec![PageItem::Page(1)];
    if left > 2 {
        items.push(PageItem::Ellipsis);
    } else {
        items.extend((2..left).map(PageItem::Page));
    }

    items.extend(
        (left..=right)
            .filter(|page| *page != 1 && *page != total)
            .map(PageItem::Page),
    );

    if right < total - 1 {
        items.push(PageItem::Ellipsis);
    } else {
        items.extend((right.saturating_add(1)..total).map(PageItem::Page));
    }

    if total > 1 {
        items.push(PageItem::Page(total));
    }
    items
}

/// Number of pages needed for `item_count` items, `0` when there are none.
#[must_use]
pub fn total_pages(item_count: usize, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = item_count.div_ceil(page_size as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// URL for `target_page` that preserves every other query parameter.
#[must_use]
pub fn build_page_href(base_path: &str, query_pairs: &[(String, String)], target_page: u32) -> String {
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(query_pairs.len() + 1);
    if target_page <= 1 {
        pairs.extend(
            query_pairs
                .iter()
                .filter(|(name, _)| name != PAGE_PARAM)
                .cloned(),
        );
    } else {
        let mut placed = false;
        for (name, value) in query_pairs {
            if name == PAGE_PARAM {
                if !placed {
                    pairs.push((name.clone(), target_page.to_string()));
                    placed = true;
                }
            } else {
                pairs.push((name.clone(), value.clone()));
            }
        }
        if !placed {
            pairs.push((PAGE_PARAM.to_string(), target_page.to_string()));
        }
    }

    if pairs.is_empty() {
        return base_path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())))
        .finish();
    format!("{base_path}?{query}")
}

/// Previous/next control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Target page number.
    pub page: u32,
    /// Link target; absent when the control is disabled.
    pub href: Option<String>,
    /// Whether the control is rendered non-interactive.
    pub disabled: bool,
}

/// One rendered slot of the page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    /// Page number or ellipsis.
    pub item: PageItem,
    /// Link target; absent for the current page and ellipses.
    pub href: Option<String>,
    /// Whether this is the page being shown.
    pub current: bool,
}

/// Everything needed to render pagination for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    /// Page being shown.
    pub current_page: u32,
    /// Total page count.
    pub total_pages: u32,
    /// Previous-page control.
    pub previous: PageLink,
    /// Next-page control.
    pub next: PageLink,
    /// Window of page numbers.
    pub pages: Vec<PageEntry>,
}

impl PaginationControls {
    /// Controls for `current` of `total`, or `None` when a single page needs none.
    #[must_use]
    pub fn build(
        base_path: &str,
        query_pairs: &[(String, String)],
        current: u32,
        total: u32,
        siblings: u32,
    ) -> Option<Self> {
        if total <= 1 {
            return None;
        }
        let href = |page: u32| Some(build_page_href(base_path, query_pairs, page));

        let is_first = current <= 1;
        let is_last = current >= total;
        let previous_page = current.saturating_sub(1).max(1);
        let next_page = current.saturating_add(1).min(total);

        let pages = page_window(current, total, siblings)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(page) if page == current => PageEntry {
                    item,
                    href: None,
                    current: true,
                },
                PageItem::Page(page) => PageEntry {
                    item,
                    href: href(page),
                    current: false,
                },
                PageItem::Ellipsis => PageEntry {
                    item,
                    href: None,
                    current: false,
                },
            })
            .collect();

        Some(Self {
            current_page: current,
            total_pages: total,
            previous: PageLink {
                page: previous_page,
                href: if is_first { None } else { href(previous_page) },
                disabled: is_first,
            },
            next: PageLink {
                page: next_page,
                href: if is_last { None } else { href(next_page) },
                disabled: is_last,
            },
            pages,
        })
    }
}
