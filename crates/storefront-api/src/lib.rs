#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(missing_docs, unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! HTTP surface of the storefront: locale negotiation, localized catalog
//! pages, label and catalog administration, health, and metrics.
//!
//! Layout: `state.rs` (shared state and the dictionary cache), `models.rs`
//! (wire shapes), `http/` (router, middleware, and handlers).

pub mod http;
pub mod models;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use http::router::ApiServer;
pub use state::{ApiDependencies, HealthProbe};
