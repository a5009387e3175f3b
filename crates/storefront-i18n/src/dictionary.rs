//! UI dictionaries: bundled JSON defaults overlaid by persisted labels.
//!
//! # Design
//!
//! - One bundle per supported locale is embedded at build time and parsed once.
//! - A bundle that fails to parse degrades to an empty dictionary and logs once.
//! - Persisted labels take precedence; [`FallbackPolicy`] decides whether they
//!   replace the bundle wholesale or overlay it key by key.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use tracing::{debug, error};

use crate::error::{I18nError, I18nResult};
use crate::labels::{LabelRow, LabelStore};
use crate::locale::Locale;

/// Namespace → key → localized text.
pub type Dictionary = BTreeMap<String, BTreeMap<String, String>>;

/// How persisted labels combine with the bundled dictionary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Any persisted row for the locale replaces the bundle entirely.
    #[default]
    Replace,
    /// Persisted rows overlay the bundle one key at a time.
    MergePerKey,
}

impl FallbackPolicy {
    /// Parse the configuration spelling (`replace` or `merge`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Some(Self::Replace),
            "merge" | "merge-per-key" => Some(Self::MergePerKey),
            _ => None,
        }
    }

    /// Configuration spelling of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::MergePerKey => "merge",
        }
    }
}

/// Bundled dictionary for `locale`.
#[must_use]
pub fn static_dictionary(locale: Locale) -> &'static Dictionary {
    static EN_BE: LazyLock<Dictionary> = LazyLock::new(|| parse_bundle(Locale::EnBe));
    static EN_IN: LazyLock<Dictionary> = LazyLock::new(|| parse_bundle(Locale::EnIn));
    static NL_BE: LazyLock<Dictionary> = LazyLock::new(|| parse_bundle(Locale::NlBe));
    static HI_IN: LazyLock<Dictionary> = LazyLock::new(|| parse_bundle(Locale::HiIn));
    match locale {
        Locale::EnBe => &EN_BE,
        Locale::EnIn => &EN_IN,
        Locale::NlBe => &NL_BE,
        Locale::HiIn => &HI_IN,
    }
}

const fn raw_bundle(locale: Locale) -> &'static str {
    match locale {
        Locale::EnBe => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/dictionaries/en-BE.json")),
        Locale::EnIn => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/dictionaries/en-IN.json")),
        Locale::NlBe => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/dictionaries/nl-BE.json")),
        Locale::HiIn => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/dictionaries/hi-IN.json")),
    }
}

fn parse_bundle(locale: Locale) -> Dictionary {
    match serde_json::from_str::<Dictionary>(raw_bundle(locale)) {
        Ok(dictionary) => dictionary,
        Err(err) => {
            error!(
                error = %err,
                locale = locale.as_str(),
                "failed to parse static dictionary"
            );
            Dictionary::new()
        }
    }
}

/// Flatten a dictionary into label rows for `locale`.
#[must_use]
pub fn dictionary_rows(locale: Locale, dictionary: &Dictionary) -> Vec<LabelRow> {
    dictionary
        .iter()
        .flat_map(|(namespace, keys)| {
            keys.iter().map(move |(key, value)| LabelRow {
                locale,
                namespace: namespace.clone(),
                key: key.clone(),
                value: value.clone(),
            })
        })
        .collect()
}

/// Builds the dictionary served for a locale.
#[derive(Clone)]
pub struct DictionaryLoader {
    store: Arc<dyn LabelStore>,
    policy: FallbackPolicy,
}

impl DictionaryLoader {
    /// Loader backed by `store` with the given fallback policy.
    #[must_use]
    pub fn new(store: Arc<dyn LabelStore>, policy: FallbackPolicy) -> Self {
        Self { store, policy }
    }

    /// Policy in effect.
    #[must_use]
    pub const fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Dictionary for a locale identifier.
    ///
    /// # Errors
    ///
    /// [`I18nError::UnsupportedLocale`] when `locale` is not supported and
    /// [`I18nError::Store`] when persisted labels cannot be read.
    pub async fn load(&self, locale: &str) -> I18nResult<Dictionary> {
        let locale = Locale::parse(locale).ok_or_else(|| I18nError::UnsupportedLocale {
            locale: locale.to_string(),
        })?;
        self.load_locale(locale).await
    }

    /// Dictionary for an already validated locale.
    ///
    /// # Errors
    ///
    /// [`I18nError::Store`] when persisted labels cannot be read.
    pub async fn load_locale(&self, locale: Locale) -> I18nResult<Dictionary> {
        let rows = self
            .store
            .labels_for_locale(locale)
            .await
            .map_err(|err| I18nError::store("dictionary.load", err))?;

        if rows.is_empty() {
            debug!(locale = %locale, "no persisted labels; serving static dictionary");
            return Ok(static_dictionary(locale).clone());
        }

        let mut dictionary = match self.policy {
            FallbackPolicy::Replace => Dictionary::new(),
            FallbackPolicy::MergePerKey => static_dictionary(locale).clone(),
        };
        let count = rows.len();
        for row in rows {
            dictionary
                .entry(row.namespace)
                .or_default()
                .insert(row.key, row.value);
        }
        debug!(
            locale = %locale,
            rows = count,
            policy = self.policy.as_str(),
            "dictionary built from persisted labels"
        );
        Ok(dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::tests::{MemoryLabelStore, row};
    use std::collections::BTreeSet;

    fn key_set(dictionary: &Dictionary) -> BTreeSet<(String, String)> {
        dictionary
            .iter()
            .flat_map(|(ns, keys)| keys.keys().map(move |key| (ns.clone(), key.clone())))
            .collect()
    }

    #[test]
    fn every_bundle_matches_default_key_set() {
        let expected = key_set(static_dictionary(crate::locale::DEFAULT_LOCALE));
        assert!(!expected.is_empty());
        for locale in Locale::all() {
            assert_eq!(key_set(static_dictionary(locale)), expected, "{locale}");
        }
    }

    #[test]
    fn bundles_carry_shipped_namespaces() {
        let dictionary = static_dictionary(Locale::EnBe);
        let namespaces: Vec<_> = dictionary.keys().map(String::as_str).collect();
        assert_eq!(namespaces, ["common", "home", "localeModal", "products"]);
        assert!(dictionary["home"].contains_key("bannerHeading"));
        assert!(dictionary["products"].contains_key("addToCart"));
    }

    #[tokio::test]
    async fn empty_store_serves_static_bundle() {
        let loader = DictionaryLoader::new(
            Arc::new(MemoryLabelStore::default()),
            FallbackPolicy::Replace,
        );
        for locale in Locale::all() {
            let loaded = loader.load(locale.as_str()).await.expect("load");
            assert_eq!(&loaded, static_dictionary(locale));
        }
    }

    #[tokio::test]
    async fn persisted_rows_replace_bundle() {
        let store = MemoryLabelStore::with_rows(vec![
            row(Locale::NlBe, "home", "shopNow", "Nu kopen"),
            row(Locale::EnBe, "home", "shopNow", "ignored"),
        ]);
        let loader = DictionaryLoader::new(Arc::new(store), FallbackPolicy::Replace);
        let loaded = loader.load("nl-BE").await.expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["home"].len(), 1);
        assert_eq!(loaded["home"]["shopNow"], "Nu kopen");
    }

    #[tokio::test]
    async fn merge_policy_overlays_bundle() {
        let store = MemoryLabelStore::with_rows(vec![row(Locale::HiIn, "home", "shopNow", "X")]);
        let loader = DictionaryLoader::new(Arc::new(store), FallbackPolicy::MergePerKey);
        let loaded = loader.load("hi-IN").await.expect("load");
        assert_eq!(loaded["home"]["shopNow"], "X");
        assert_eq!(
            key_set(&loaded),
            key_set(static_dictionary(Locale::HiIn))
        );
    }

    #[tokio::test]
    async fn unsupported_locale_and_store_failures() {
        let loader = DictionaryLoader::new(
            Arc::new(MemoryLabelStore::default()),
            FallbackPolicy::default(),
        );
        assert!(matches!(
            loader.load("de-DE").await,
            Err(I18nError::UnsupportedLocale { locale }) if locale == "de-DE"
        ));

        let failing = DictionaryLoader::new(
            Arc::new(MemoryLabelStore::failing()),
            FallbackPolicy::Replace,
        );
        assert!(matches!(
            failing.load("en-BE").await,
            Err(I18nError::Store { .. })
        ));
    }

    #[test]
    fn dictionary_rows_flatten_every_key() {
        let dictionary = static_dictionary(Locale::EnIn);
        let rows = dictionary_rows(Locale::EnIn, dictionary);
        assert_eq!(rows.len(), key_set(dictionary).len());
        assert!(rows.iter().all(|row| row.locale == Locale::EnIn));
    }

    #[test]
    fn fallback_policy_parses_config_spellings() {
        assert_eq!(FallbackPolicy::parse("replace"), Some(FallbackPolicy::Replace));
        assert_eq!(FallbackPolicy::parse(" MERGE "), Some(FallbackPolicy::MergePerKey));
        assert_eq!(FallbackPolicy::parse("other"), None);
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Replace);
    }
}
