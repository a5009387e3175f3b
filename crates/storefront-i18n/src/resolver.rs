//! Path and cookie based locale negotiation.
//!
//! # Design
//!
//! - The first path segment names the locale; anything unsupported redirects to `/`.
//! - The root path honors a remembered locale cookie and otherwise shows the selector.
//! - Resolution is total: every input maps to exactly one [`LocaleDecision`].

use crate::locale::{COOKIE_LOCALE, COOKIE_MAX_AGE_SECS, Locale};

/// Outcome of inspecting an inbound request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocaleDecision {
    /// Serve the request as-is.
    Passthrough,
    /// Redirect the visitor to `target`.
    Redirect {
        /// Absolute path to redirect to.
        target: String,
    },
}

impl LocaleDecision {
    fn redirect(target: impl Into<String>) -> Self {
        Self::Redirect {
            target: target.into(),
        }
    }
}

/// Decide whether a request path is served directly or redirected.
#[must_use]
pub fn resolve(request_path: &str, cookie_locale: Option<&str>) -> LocaleDecision {
    if request_path == "/" {
        return match cookie_locale.and_then(Locale::parse) {
            Some(locale) => LocaleDecision::redirect(format!("/{locale}")),
            None => LocaleDecision::Passthrough,
        };
    }

    if first_segment(request_path).and_then(Locale::parse).is_some() {
        LocaleDecision::Passthrough
    } else {
        LocaleDecision::redirect("/")
    }
}

fn first_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    Some(rest.split('/').next().unwrap_or(rest))
}

/// Rewrite `current_path` so its first segment is `new_locale`.
///
/// Empty segments are dropped, so `//en-BE//products/` becomes
/// `/nl-BE/products`. A path without segments becomes `/{new_locale}`.
#[must_use]
pub fn switch_locale_path(current_path: &str, new_locale: Locale) -> String {
    let mut segments: Vec<&str> = current_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    match segments.first_mut() {
        Some(first) => *first = new_locale.as_str(),
        None => segments.push(new_locale.as_str()),
    }
    format!("/{}", segments.join("/"))
}

/// Persistent locale preference cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocaleCookie {
    locale: Locale,
}

impl LocaleCookie {
    /// Cookie remembering `locale`.
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Locale carried by the cookie.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// `Set-Cookie` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!(
            "{COOKIE_LOCALE}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax",
            self.locale
        )
    }
}

/// Extract the value of cookie `name` from a raw `Cookie` request header.
#[must_use]
pub fn cookie_value(raw_header: &str, name: &str) -> Option<String> {
    raw_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"').to_string())
    })
}
