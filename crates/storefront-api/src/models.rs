//! Request and response shapes of the HTTP surface.

use serde::{Deserialize, Serialize};
use storefront_catalog::{PaginationControls, ResolvedProduct};
use storefront_i18n::{Dictionary, LabelsByNamespace, Locale};
use storefront_telemetry::MetricsSnapshot;

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Parameters that failed validation, if applicable.
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON Pointer to the offending field.
    pub pointer: String,
    /// Machine-readable description of the validation failure.
    pub message: String,
}

/// One entry of the locale picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleOption {
    /// Locale code, e.g. `nl-BE`.
    pub code: Locale,
    /// Human-readable name.
    pub label: String,
}

/// Payload of the root page: pick a locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleSelection {
    /// Locale used when nothing else applies.
    pub default_locale: Locale,
    /// Supported locales in display order.
    pub locales: Vec<LocaleOption>,
}

/// Body of `POST /locale`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwitchLocaleRequest {
    /// Requested locale; unsupported values redirect to `/`.
    pub locale: String,
    /// Page the visitor is on; its locale segment is swapped.
    #[serde(default)]
    pub path: Option<String>,
}

/// Payload of a locale home page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeResponse {
    /// Locale being served.
    pub locale: Locale,
    /// Dictionary revision; changes whenever labels or catalog data change.
    pub revision: u64,
    /// First products of the catalog, localized.
    pub featured: Vec<ResolvedProduct>,
}

/// Dictionary of one locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictionaryResponse {
    /// Locale being served.
    pub locale: Locale,
    /// Dictionary revision.
    pub revision: u64,
    /// Namespace → key → text.
    pub dictionary: Dictionary,
}

/// One page of the localized product listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductListResponse {
    /// Locale being served.
    pub locale: Locale,
    /// Products on this page.
    pub items: Vec<ResolvedProduct>,
    /// Page being shown.
    pub current_page: u32,
    /// Total page count.
    pub total_pages: u32,
    /// Products across all pages.
    pub total_items: u64,
    /// Pagination controls; absent for a single page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationControls>,
}

/// Query of the admin label listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelsQuery {
    /// Locale to list; defaults to the default locale.
    pub locale: Option<String>,
}

/// Labels of one locale grouped by namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelsResponse {
    /// Locale listed.
    pub locale: Locale,
    /// Namespace → sorted entries.
    pub namespaces: LabelsByNamespace,
}

/// Body of a label upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelUpsertRequest {
    /// New text.
    pub value: String,
}

/// Liveness report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// `ok` when the database answered.
    pub status: String,
    /// Build identifier.
    pub build: String,
    /// Current dictionary revision.
    pub revision: u64,
    /// Write and cache counters.
    pub metrics: MetricsSnapshot,
}
