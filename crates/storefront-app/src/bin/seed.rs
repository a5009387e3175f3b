//! Reset the demo catalog and store the bundled dictionaries.

use std::error::Error;
use std::process::ExitCode;

use storefront_app::run_seed;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    match run_seed().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let cause = err.source().map(ToString::to_string).unwrap_or_default();
            error!(operation = err.operation(), error = %err, cause = %cause, "seed failed");
            eprintln!("storefront-seed: {err} during {}: {cause}", err.operation());
            ExitCode::FAILURE
        }
    }
}
