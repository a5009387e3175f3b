#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Storefront application wiring.
//!
//! Layout: `bootstrap.rs` (configuration, logging, database, and listener
//! startup), `error.rs` (application error type).

/// Application bootstrap for the API server and the seed command.
pub mod bootstrap;
/// Application-level error type.
pub mod error;

pub use bootstrap::{run_app, run_seed};
pub use error::{AppError, AppResult};
