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

//! Locale negotiation and UI dictionaries for the storefront.
//!
//! Layout: `locale.rs` (supported locale registry), `resolver.rs` (path/cookie
//! negotiation and locale switching), `dictionary.rs` (static bundles and the
//! persisted-label loader), `labels.rs` (admin label grouping and edits).

pub mod dictionary;
pub mod error;
pub mod labels;
pub mod locale;
pub mod resolver;

pub use dictionary::{
    Dictionary, DictionaryLoader, FallbackPolicy, dictionary_rows, static_dictionary,
};
pub use error::{I18nError, I18nResult};
pub use labels::{
    LabelBoard, LabelEntry, LabelRow, LabelStore, LabelsByNamespace, StagedEdit,
    get_labels_for_locale, group_labels, upsert_label, validate_label,
};
pub use locale::{
    COOKIE_LOCALE, COOKIE_MAX_AGE_SECS, DEFAULT_LOCALE, Locale, language_code,
};
pub use resolver::{LocaleCookie, LocaleDecision, cookie_value, resolve, switch_locale_path};
