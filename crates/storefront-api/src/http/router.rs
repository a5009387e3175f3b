//! Router construction and server host for the storefront API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router,
    http::{HeaderName, Method, Request, header::CONTENT_TYPE},
    middleware,
    routing::{get, patch, post, put},
};
use storefront_telemetry::{
    HEADER_REQUEST_ID, build_sha, propagate_request_id_layer, set_request_id_layer,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::http::admin::{
    list_categories, list_labels, list_products, patch_category, patch_product,
    put_category_translation, put_label, put_product_translation,
};
use crate::http::health::{health, metrics};
use crate::http::locale::{locale_redirect, switch_locale};
use crate::http::storefront::{
    categories, dictionary, home, locale_selection, product_detail, products,
};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::{ApiDependencies, ApiState};

/// Axum router wrapper that hosts the storefront and admin routes.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Wire `deps` into shared state and build the layered router.
    #[must_use]
    pub fn new(deps: ApiDependencies) -> Self {
        let telemetry = deps.telemetry.clone();
        let state = Arc::new(ApiState::new(deps));
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(HEADER_REQUEST_ID)]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let locale_layer = middleware::from_fn_with_state(Arc::clone(&state), locale_redirect);
        let router = Self::storefront_routes()
            .merge(Self::admin_routes())
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route_layer(layered)
            .layer(locale_layer)
            .layer(cors_layer)
            .with_state(state);

        Self { router }
    }

    fn storefront_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/", get(locale_selection))
            .route("/locale", post(switch_locale))
            .route("/{locale}", get(home))
            .route("/{locale}/", get(home))
            .route("/{locale}/dictionary", get(dictionary))
            .route("/{locale}/products", get(products))
            .route("/{locale}/products/{slug}", get(product_detail))
            .route("/{locale}/categories", get(categories))
    }

    fn admin_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/admin/labels", get(list_labels))
            .route("/admin/labels/{locale}/{namespace}/{key}", put(put_label))
            .route("/admin/products", get(list_products))
            .route("/admin/products/{id}", patch(patch_product))
            .route(
                "/admin/products/{id}/translations/{language}",
                put(put_product_translation),
            )
            .route("/admin/categories", get(list_categories))
            .route("/admin/categories/{id}", patch(patch_category))
            .route(
                "/admin/categories/{id}/translations/{language}",
                put(put_category_translation),
            )
    }

    /// Serve the router on `addr` until the process stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        info!(addr = %addr, "Starting API listener");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router.into_make_service()).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) const fn router(&self) -> &Router {
        &self.router
    }
}
