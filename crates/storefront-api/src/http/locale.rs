//! Locale redirect middleware and the locale switch endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{
        HeaderMap,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use storefront_i18n::{
    COOKIE_LOCALE, Locale, LocaleCookie, LocaleDecision, cookie_value, resolve,
    switch_locale_path,
};
use tracing::{debug, info};

use crate::http::constants::{LOCALE_EXEMPT_PREFIXES, STATIC_ASSET_EXTENSIONS};
use crate::models::SwitchLocaleRequest;
use crate::state::ApiState;

fn is_static_asset(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').is_some_and(|(stem, extension)| {
        !stem.is_empty()
            && STATIC_ASSET_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
    })
}

fn is_exempt(path: &str) -> bool {
    is_static_asset(path)
        || LOCALE_EXEMPT_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
}

fn locale_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| cookie_value(raw, COOKIE_LOCALE))
}

/// Redirect storefront requests whose path does not start with a supported locale.
pub(crate) async fn locale_redirect(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(request).await;
    }
    let cookie = locale_cookie(request.headers());
    match resolve(&path, cookie.as_deref()) {
        LocaleDecision::Passthrough => next.run(request).await,
        LocaleDecision::Redirect { target } => {
            let reason = if path == "/" { "cookie" } else { "unsupported" };
            state.telemetry.inc_locale_redirect(reason);
            debug!(path = %path, target = %target, reason, "locale redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}

/// Remember the chosen locale in a cookie and send the visitor to the localized page.
pub(crate) async fn switch_locale(Json(body): Json<SwitchLocaleRequest>) -> Response {
    let Some(locale) = Locale::parse(&body.locale) else {
        debug!(locale = %body.locale, "locale switch rejected");
        return Redirect::to("/").into_response();
    };
    let target = body.path.as_deref().map_or_else(
        || format!("/{locale}"),
        |path| switch_locale_path(path, locale),
    );
    info!(locale = %locale, target = %target, "locale switched");
    (
        [(SET_COOKIE, LocaleCookie::new(locale).header_value())],
        Redirect::to(&target),
    )
        .into_response()
}
