//! HTTP surface modules (router, middleware, handlers).

/// Label and catalog administration handlers.
pub mod admin;
/// Shared constants and header names.
pub mod constants;
/// Problem response helpers and error mapping.
pub mod errors;
/// Health and metrics endpoints.
pub mod health;
/// Locale redirect middleware and the locale switch endpoint.
pub mod locale;
/// Router construction and server host.
pub mod router;
/// Localized storefront handlers.
pub mod storefront;
/// Metrics middleware for HTTP requests.
pub mod telemetry;
