#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(missing_docs, unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Shared helpers for storefront integration suites.

pub mod postgres;

pub use self::postgres::{TEST_DATABASE_URL_ENV, TestDatabase, start_postgres};
