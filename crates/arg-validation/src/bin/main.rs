//! Argument validation CLI
//!
//! # Usage
//!
//! ```bash
//! # Run the embedded examples
//! arg-validate selftest
//!
//! # Check a call against a guard definition
//! arg-validate check --definition guard.yaml --kwargs '{"method": "get"}'
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - all guards accepted / all examples passed
//! - 1: A call was rejected or an example failed
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 10: Internal error

use arg_validation::{run_cli, ValidateCli};
use clap::Parser;
use tracing::Level;

fn main() {
    let cli = ValidateCli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
