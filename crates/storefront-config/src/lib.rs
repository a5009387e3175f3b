#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(missing_docs, unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Process configuration read from the environment.
//!
//! Layout: `model.rs` (typed settings and defaults), `loader.rs` (environment
//! parsing and validation), `error.rs` (`ConfigError`).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ENV_BIND_ADDR, ENV_DATABASE_URL, ENV_DB_MAX_CONNECTIONS, ENV_DICTIONARY_FALLBACK,
    ENV_HTTP_PORT, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
};
pub use model::AppConfig;
