//! # `sparsepick`
//!
//! Pull one directory out of a Git repository without fetching the rest of
//! its working tree.
//!
//! ## Usage
//!
//! ```sh
//! sparsepick https://github.com/org/mono.git services/api
//! ```
//!
//! leaves `./api` holding the contents of `services/api`.
//! See `sparsepick --help` for options.

use sparsepick::cli::{Invocation, parse_invocation};
use sparsepick::error::ExtractError;
use sparsepick::operations::RunOutcome;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = match parse_invocation(std::env::args_os()) {
        Invocation::Run(args) => args,
        Invocation::Exit(code) => std::process::exit(code),
    };

    // Initialize tracing subscriber based on verbose flag
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match sparsepick::run(&args) {
        Ok(RunOutcome::Extracted { destination, .. }) => {
            info!("\u{2713} Extracted into {}", destination.display());
            std::process::exit(0);
        }
        Ok(RunOutcome::NothingExtracted { warnings }) => {
            info!(
                "Finished with {} warning(s); nothing was extracted",
                warnings.len()
            );
            std::process::exit(0);
        }
        Err(err) => {
            match err.downcast_ref::<ExtractError>() {
                Some(extract_err) => error!("{} stage failed: {:#}", extract_err.stage(), err),
                None => error!("{:#}", err),
            }
            std::process::exit(
                err.downcast_ref::<ExtractError>()
                    .map_or(1, ExtractError::exit_code),
            );
        }
    }
}
