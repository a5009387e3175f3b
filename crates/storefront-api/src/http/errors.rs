//! RFC9457-style API error wrapper and domain error mapping.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use storefront_catalog::CatalogError;
use storefront_i18n::I18nError;
use storefront_telemetry::{current_request_id, current_route};
use tracing::error;

use crate::http::constants::{
    PROBLEM_BAD_REQUEST, PROBLEM_INTERNAL, PROBLEM_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE,
};
use crate::models::{ProblemDetails, ProblemInvalidParam};

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Structured API error with optional RFC9457 fields.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) kind: &'static str,
    title: &'static str,
    pub(crate) detail: Option<String>,
    pub(crate) invalid_params: Option<Vec<ProblemInvalidParam>>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            invalid_params: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn with_invalid_param(mut self, field: &str, message: &str) -> Self {
        self.invalid_params = Some(vec![ProblemInvalidParam {
            pointer: format!("/{field}"),
            message: message.to_string(),
        }]);
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_detail(detail)
    }

    pub(crate) fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            PROBLEM_SERVICE_UNAVAILABLE,
            "service unavailable",
        )
        .with_detail(detail)
    }
}

impl From<I18nError> for ApiError {
    fn from(err: I18nError) -> Self {
        match err {
            I18nError::UnsupportedLocale { locale } => {
                Self::bad_request(format!("unsupported locale '{locale}'"))
                    .with_invalid_param("locale", "unsupported")
            }
            I18nError::InvalidLabel { field, reason } => {
                Self::bad_request("label rejected").with_invalid_param(field, reason)
            }
            I18nError::Store { operation, source } => {
                error!(
                    operation,
                    error = %source,
                    request_id = %current_request_id().unwrap_or_default(),
                    route = %current_route().unwrap_or_default(),
                    "label store failure"
                );
                Self::internal("label store unavailable")
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { entity, id } => {
                Self::not_found(format!("{entity} {id} does not exist"))
            }
            CatalogError::InvalidField { field, reason } => {
                Self::bad_request("catalog update rejected").with_invalid_param(field, reason)
            }
            CatalogError::UnsupportedLanguage { language } => {
                Self::bad_request(format!("unsupported language '{language}'"))
                    .with_invalid_param("language", "unsupported")
            }
            CatalogError::Store { operation, source } => {
                error!(
                    operation,
                    error = %source,
                    request_id = %current_request_id().unwrap_or_default(),
                    route = %current_route().unwrap_or_default(),
                    "catalog store failure"
                );
                Self::internal("catalog store unavailable")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            invalid_params: self.invalid_params,
        };
        let mut response = (self.status, Json(body)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_telemetry::with_request_context;
    use uuid::Uuid;

    #[tokio::test]
    async fn store_failures_inside_a_request_stay_internal() {
        let (route, error) = with_request_context("req-7", "/{locale}/products", async {
            let error = ApiError::from(CatalogError::Store {
                operation: "catalog.page",
                source: "offline".into(),
            });
            (current_route(), error)
        })
        .await;
        assert_eq!(route.as_deref(), Some("/{locale}/products"));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.detail.as_deref(), Some("catalog store unavailable"));
    }

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (
                ApiError::from(I18nError::UnsupportedLocale {
                    locale: "fr-FR".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(I18nError::InvalidLabel {
                    field: "key",
                    reason: "empty",
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(I18nError::store("labels.fetch", "offline")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(CatalogError::NotFound {
                    entity: "product",
                    id: Uuid::nil(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(CatalogError::UnsupportedLanguage {
                    language: "fr".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status, status);
        }
    }

    #[test]
    fn invalid_fields_carry_a_pointer() {
        let error = ApiError::from(CatalogError::InvalidField {
            field: "price_cents",
            reason: "negative",
        });
        let params = error.invalid_params.expect("pointer present");
        assert_eq!(params[0].pointer, "/price_cents");
        assert_eq!(params[0].message, "negative");
    }

    #[test]
    fn problem_responses_use_problem_json() {
        let response = ApiError::not_found("missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static(PROBLEM_CONTENT_TYPE))
        );
    }
}
