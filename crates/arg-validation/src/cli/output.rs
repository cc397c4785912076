//! Output formatting for the CLI
//!
//! JSON, YAML and human-readable table renderings of check results and the
//! example report.

use clap::ValueEnum;
use colored::Colorize;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::call::CallArgs;
use crate::error::ArgError;
use crate::rules::{Rejection, RuleCategory};
use crate::selftest::SelfTestReport;
use crate::value::ArgValue;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Result of checking one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
    /// Whether every guard accepted the call
    pub valid: bool,
    /// Rendered signature of the checked callable
    pub function: String,
    /// Keyword arguments that were accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<IndexMap<String, ArgValue>>,
    /// Id of the rule that rejected the call, e.g. `allowed-values`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<RuleCategory>,
    /// Rejection kind, e.g. `type_mismatch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Rejection message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckOutput {
    pub fn accepted(function: String, args: CallArgs) -> Self {
        Self {
            valid: true,
            function,
            accepted: Some(args.keyword),
            rule: None,
            category: None,
            error_kind: None,
            message: None,
        }
    }

    pub fn rejected(function: String, rejection: &Rejection) -> Self {
        Self {
            valid: false,
            function,
            accepted: None,
            rule: Some(rejection.rule.clone()),
            category: Some(rejection.category),
            error_kind: Some(rejection.error.kind().to_string()),
            message: Some(rejection.error.to_string()),
        }
    }

    /// Render output in the specified format
    pub fn render<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<(), ArgError> {
        match format {
            OutputFormat::Json => render_json(self, out),
            OutputFormat::Yaml => render_yaml(self, out),
            OutputFormat::Table => self.render_table(out),
        }
    }

    fn render_table<W: Write>(&self, out: &mut W) -> Result<(), ArgError> {
        writeln!(out, "{}", "Argument Check".cyan().bold())?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Function: {}", self.function)?;

        if self.valid {
            writeln!(out, "{} All guards accepted the call", "+".green())?;
            if let Some(accepted) = &self.accepted {
                for (name, value) in accepted {
                    writeln!(out, "  {} = {}", name.bold(), value)?;
                }
            }
        } else {
            let kind = self.error_kind.as_deref().unwrap_or("rejected");
            writeln!(out, "{} {}", "x".red(), kind.red().bold())?;
            if let (Some(rule), Some(category)) = (&self.rule, &self.category) {
                writeln!(out, "  Rule: {} ({})", rule, category)?;
            }
            if let Some(message) = &self.message {
                writeln!(out, "  {}", message)?;
            }
        }
        Ok(())
    }
}

fn render_json<T: Serialize, W: Write>(value: &T, out: &mut W) -> Result<(), ArgError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ArgError::SerializationError(e.to_string()))?;
    writeln!(out, "{}", json)?;
    Ok(())
}

fn render_yaml<T: Serialize, W: Write>(value: &T, out: &mut W) -> Result<(), ArgError> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| ArgError::SerializationError(e.to_string()))?;
    writeln!(out, "{}", yaml)?;
    Ok(())
}

/// Render the example report; the table form lists every case verbosely
pub fn render_report(report: &SelfTestReport, format: OutputFormat) -> Result<(), ArgError> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Json => render_json(report, &mut stdout),
        OutputFormat::Yaml => render_yaml(report, &mut stdout),
        OutputFormat::Table => {
            write!(stdout, "{}", report_table(report))?;
            Ok(())
        }
    }
}

/// Plain-text verbose report (colors applied when the terminal supports them)
pub fn report_table(report: &SelfTestReport) -> String {
    let mut out = String::new();

    for case in &report.cases {
        out.push_str(&format!("Trying:\n    {}\n", case.source));
        out.push_str(&format!("Expecting:\n    {}\n", case.expected));
        if case.passed {
            out.push_str(&format!("{}\n", "ok".green()));
        } else {
            out.push_str(&format!("{}\n", "FAILED".red().bold()));
            out.push_str(&format!("Got:\n    {}\n", case.got));
        }
    }

    out.push_str(&format!("{} tests in {}\n", report.cases.len(), report.suite));
    out.push_str(&format!(
        "{} passed and {} failed.\n",
        report.passed(),
        report.failed()
    ));
    if report.all_passed() {
        out.push_str(&format!("{}\n", "Test passed.".green().bold()));
    } else {
        out.push_str(&format!(
            "{}\n",
            format!("***Test Failed*** {} failures.", report.failed())
                .red()
                .bold()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selftest::CaseOutcome;

    #[test]
    fn test_check_output_accepted() {
        let args = CallArgs::new().kwarg("method", "get");
        let output = CheckOutput::accepted("f('method',)".to_string(), args);
        assert!(output.valid);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["accepted"]["method"], "get");
        assert!(json.get("error_kind").is_none());
    }

    #[test]
    fn test_check_output_rejected() {
        let rejection = Rejection {
            rule: "allowed-values".to_string(),
            category: RuleCategory::AllowedValues,
            error: ArgError::MissingArgument {
                name: "method".to_string(),
                function: "f('method',)".to_string(),
            },
        };
        let output = CheckOutput::rejected("f('method',)".to_string(), &rejection);
        assert!(!output.valid);
        assert_eq!(output.error_kind.as_deref(), Some("missing_argument"));

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["rule"], "allowed-values");
        assert_eq!(json["category"], "allowed_values");

        colored::control::set_override(false);
        let mut table = Vec::new();
        output.render(OutputFormat::Table, &mut table).unwrap();
        let table = String::from_utf8(table).unwrap();
        assert!(table.contains("Rule: allowed-values (allowed_values)"));
    }

    #[test]
    fn test_accepted_keywords_keep_call_order() {
        let args = CallArgs::new().kwarg("zeta", 1).kwarg("alpha", 2);
        let output = CheckOutput::accepted("f('zeta', 'alpha')".to_string(), args);
        let mut json = Vec::new();
        output.render(OutputFormat::Json, &mut json).unwrap();
        let json = String::from_utf8(json).unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_report_table() {
        colored::control::set_override(false);
        let report = SelfTestReport {
            suite: "suite".to_string(),
            cases: vec![CaseOutcome {
                source: "call()".to_string(),
                expected: "x".to_string(),
                got: "y".to_string(),
                passed: false,
            }],
        };
        let table = report_table(&report);
        assert!(table.contains("Trying:\n    call()\n"));
        assert!(table.contains("Got:\n    y\n"));
        assert!(table.contains("0 passed and 1 failed."));
        assert!(table.contains("***Test Failed*** 1 failures."));
    }
}
