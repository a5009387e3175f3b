//! Supported storefront locales.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Locales the storefront serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    /// English (Belgium).
    #[serde(rename = "en-BE")]
    EnBe,
    /// English (India).
    #[serde(rename = "en-IN")]
    EnIn,
    /// Dutch (Belgium).
    #[serde(rename = "nl-BE")]
    NlBe,
    /// Hindi (India).
    #[serde(rename = "hi-IN")]
    HiIn,
}

impl Locale {
    /// All supported locales in display order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::EnBe, Self::EnIn, Self::NlBe, Self::HiIn]
    }

    /// Locale identifier as used in paths and cookies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnBe => "en-BE",
            Self::EnIn => "en-IN",
            Self::NlBe => "nl-BE",
            Self::HiIn => "hi-IN",
        }
    }

    /// Human-friendly label for selection lists.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnBe => "English (Belgium)",
            Self::EnIn => "English (India)",
            Self::NlBe => "Dutch (Belgium)",
            Self::HiIn => "Hindi (India)",
        }
    }

    /// Language code used to select translation rows.
    #[must_use]
    pub const fn language(self) -> &'static str {
        match self {
            Self::EnBe | Self::EnIn => "en",
            Self::NlBe => "nl",
            Self::HiIn => "hi",
        }
    }

    /// Exact, case-sensitive membership test against the registry.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|locale| locale.as_str() == value)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Locale {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

/// Locale used when nothing else applies.
pub const DEFAULT_LOCALE: Locale = Locale::EnBe;

/// Cookie carrying the visitor's chosen locale.
pub const COOKIE_LOCALE: &str = "NEXT_LOCALE";

/// Lifetime of the locale cookie (one year).
pub const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Language portion of a locale identifier: everything before the first `-`.
#[must_use]
pub fn language_code(locale: &str) -> &str {
    locale.split_once('-').map_or(locale, |(language, _)| language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_exact_members() {
        for locale in Locale::all() {
            assert_eq!(Locale::parse(locale.as_str()), Some(locale));
        }
        assert_eq!(Locale::parse("en-be"), None);
        assert_eq!(Locale::parse("fr-FR"), None);
        assert_eq!(Locale::parse(""), None);
        assert_eq!(Locale::parse("en"), None);
    }

    #[test]
    fn registry_order_and_labels() {
        let codes: Vec<_> = Locale::all().iter().map(|l| l.as_str()).collect();
        assert_eq!(codes, ["en-BE", "en-IN", "nl-BE", "hi-IN"]);
        assert_eq!(Locale::NlBe.label(), "Dutch (Belgium)");
        assert_eq!(Locale::default(), Locale::EnBe);
        assert_eq!(Locale::HiIn.to_string(), "hi-IN");
    }

    #[test]
    fn language_code_splits_on_first_dash() {
        assert_eq!(language_code("en-BE"), "en");
        assert_eq!(language_code("hi-IN"), "hi");
        assert_eq!(language_code("fr"), "fr");
        assert_eq!(language_code(""), "");
        assert_eq!(language_code("zh-Hant-TW"), "zh");
        for locale in Locale::all() {
            assert_eq!(language_code(locale.as_str()), locale.language());
        }
    }

    #[test]
    fn serde_uses_locale_identifiers() {
        let json = serde_json::to_string(&Locale::EnIn).expect("serialize");
        assert_eq!(json, "\"en-IN\"");
        let parsed: Locale = serde_json::from_str("\"nl-BE\"").expect("deserialize");
        assert_eq!(parsed, Locale::NlBe);
    }
}
