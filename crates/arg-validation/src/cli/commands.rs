//! CLI command definitions
//!
//! Clap-based commands for running the embedded examples and checking a call
//! against a guard definition.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::output::{render_report, CheckOutput, OutputFormat};
use super::ExitCode;
use crate::call::CallArgs;
use crate::definition::GuardDefinition;
use crate::error::ArgError;
use crate::selftest;

/// Argument validation CLI
#[derive(Parser, Debug)]
#[command(name = "arg-validate")]
#[command(about = "Check keyword arguments against type and allowed-value guards", long_about = None)]
#[command(version)]
pub struct ValidateCli {
    /// Output verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: ValidateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ValidateCommands {
    /// Run the embedded examples and report each result
    Selftest {
        /// Output format for the report
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Check one call against a guard definition
    ///
    /// The definition file may be JSON, YAML or TOML.
    Check {
        /// Path to the guard definition file
        #[arg(short, long)]
        definition: PathBuf,

        /// Keyword arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        kwargs: String,

        /// Positional arguments as a JSON array
        #[arg(short, long)]
        args: Option<String>,

        /// Output format for the result
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Execute the selftest command
pub fn execute_selftest(format: Option<OutputFormat>, quiet: bool) -> Result<ExitCode, ArgError> {
    let report = selftest::run_examples();
    info!(
        passed = report.passed(),
        failed = report.failed(),
        "examples finished"
    );

    if !quiet {
        render_report(&report, format.unwrap_or_default())?;
    }

    Ok(ExitCode::from_outcome(report.all_passed()))
}

/// Execute the check command
pub fn execute_check(
    definition: PathBuf,
    kwargs: String,
    args: Option<String>,
    format: Option<OutputFormat>,
    quiet: bool,
) -> Result<ExitCode, ArgError> {
    let mut stdout = io::stdout().lock();
    check_call(&definition, &kwargs, args.as_deref(), format, quiet, &mut stdout)
}

fn check_call<W: Write>(
    definition: &Path,
    kwargs: &str,
    args: Option<&str>,
    format: Option<OutputFormat>,
    quiet: bool,
    out: &mut W,
) -> Result<ExitCode, ArgError> {
    let guard = GuardDefinition::from_path(definition)?.build()?;
    let function = guard.signature().to_string();

    let kwargs: serde_json::Value = serde_json::from_str(kwargs)
        .map_err(|e| ArgError::InvalidInput(format!("Invalid --kwargs JSON: {}", e)))?;
    let args = args
        .map(|a| serde_json::from_str::<serde_json::Value>(a))
        .transpose()
        .map_err(|e| ArgError::InvalidInput(format!("Invalid --args JSON: {}", e)))?;
    let call = CallArgs::from_json(kwargs, args)?;

    let output = match guard.rules().evaluate(guard.signature(), &call) {
        Ok(()) => CheckOutput::accepted(function, call),
        Err(rejection) if rejection.error.is_rejection() => {
            info!(rule = %rejection.rule, category = %rejection.category, "call rejected");
            CheckOutput::rejected(function, &rejection)
        }
        Err(rejection) => return Err(rejection.error),
    };

    if !quiet {
        output.render(format.unwrap_or_default(), out)?;
    }

    Ok(ExitCode::from_outcome(output.valid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = ValidateCli::try_parse_from([
            "arg-validate",
            "check",
            "--definition",
            "guard.yaml",
            "--kwargs",
            r#"{"method": "get"}"#,
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            ValidateCommands::Check {
                definition,
                kwargs,
                args,
                format,
            } => {
                assert_eq!(definition, PathBuf::from("guard.yaml"));
                assert_eq!(kwargs, r#"{"method": "get"}"#);
                assert!(args.is_none());
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_selftest_with_verbosity() {
        let cli = ValidateCli::try_parse_from(["arg-validate", "-vv", "selftest"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, ValidateCommands::Selftest { .. }));
    }

    #[test]
    fn test_selftest_exit_code() {
        assert_eq!(execute_selftest(None, true).unwrap(), ExitCode::Success);
    }

    #[test]
    fn test_check_missing_file() {
        let err = execute_check(
            PathBuf::from("/nonexistent/guard.yaml"),
            "{}".to_string(),
            None,
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ArgError::FileError(_)));
    }

    fn http_definition() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("definitions/http_resource.yaml")
    }

    #[test]
    fn test_check_renders_accepted_call() {
        let mut out = Vec::new();
        let code = check_call(
            &http_definition(),
            r#"{"method": "get"}"#,
            None,
            Some(OutputFormat::Json),
            false,
            &mut out,
        )
        .unwrap();
        assert_eq!(code, ExitCode::Success);

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["accepted"]["method"], "get");
    }

    #[test]
    fn test_check_reports_rejecting_rule() {
        let mut out = Vec::new();
        let code = check_call(
            &http_definition(),
            r#"{"method": "update"}"#,
            None,
            Some(OutputFormat::Json),
            false,
            &mut out,
        )
        .unwrap();
        assert_eq!(code, ExitCode::ValidationError);

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["rule"], "allowed-values");
        assert_eq!(json["category"], "allowed_values");
        assert_eq!(json["error_kind"], "value_not_allowed");
    }

    #[test]
    fn test_check_quiet_writes_nothing() {
        for (kwargs, expected) in [
            (r#"{"method": "get"}"#, ExitCode::Success),
            (r#"{"method": "GET"}"#, ExitCode::ValidationError),
        ] {
            let mut out = Vec::new();
            let code = check_call(&http_definition(), kwargs, None, None, true, &mut out).unwrap();
            assert_eq!(code, expected);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_parse_quiet_after_subcommand() {
        let cli = ValidateCli::try_parse_from([
            "arg-validate",
            "check",
            "-d",
            "guard.yaml",
            "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
    }
}
