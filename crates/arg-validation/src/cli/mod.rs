//! CLI module for argument validation
//!
//! Runs the embedded examples and checks ad-hoc calls against guard
//! definition files.

pub mod commands;
pub mod output;

pub use commands::{ValidateCli, ValidateCommands};
pub use output::{CheckOutput, OutputFormat};

use crate::error::ArgError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, all checks passed
    Success = 0,
    /// A call was rejected or an example failed
    ValidationError = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    pub fn from_outcome(passed: bool) -> Self {
        if passed {
            ExitCode::Success
        } else {
            ExitCode::ValidationError
        }
    }

    /// Exit code for an error that escaped a command
    pub fn from_error(err: &ArgError) -> Self {
        match err {
            ArgError::FileError(_) => ExitCode::FileError,
            e if e.is_rejection() => ExitCode::ValidationError,
            e if e.is_user_error() => ExitCode::InvalidInput,
            _ => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: ValidateCli) -> Result<ExitCode, ArgError> {
    match cli.command {
        ValidateCommands::Selftest { format } => commands::execute_selftest(format, cli.quiet),
        ValidateCommands::Check {
            definition,
            kwargs,
            args,
            format,
        } => commands::execute_check(definition, kwargs, args, format, cli.quiet),
    }
}
