//! Embedded example cases
//!
//! Each example makes one call against the demonstration callables and
//! compares the returned text, or the rejection kind and message, with the
//! expected text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::call::CallArgs;
use crate::demo::{self, HttpResource};
use crate::error::Result;
use crate::guard::{Callable, ValueValidator};
use crate::value::ArgValue;

/// Name reported for the example suite
pub const SUITE_NAME: &str = "arg_validation.examples";

struct Example {
    source: &'static str,
    run: fn() -> Result<String>,
    expected: String,
}

fn render(outcome: &Result<String>) -> String {
    match outcome {
        Ok(text) => text.clone(),
        Err(err) => format!("{}: {}", err.kind(), err),
    }
}

fn method_rejected(method: &str) -> String {
    format!(
        "value_not_allowed: The argument 'method' of the function HttpResource.handle('self', 'method') \
         can not be '{}', it must be one of following: ['get', 'post', 'put', 'delete']",
        method
    )
}

fn examples() -> Vec<Example> {
    vec![
        Example {
            source: "HttpResource::new().handle(method='get')",
            run: || HttpResource::new().handle_method("get"),
            expected: "A correct method is get".to_string(),
        },
        Example {
            source: "HttpResource::new().handle(method='post')",
            run: || HttpResource::new().handle_method("post"),
            expected: "A correct method is post".to_string(),
        },
        Example {
            source: "HttpResource::new().handle(method='put')",
            run: || HttpResource::new().handle_method("put"),
            expected: "A correct method is put".to_string(),
        },
        Example {
            source: "HttpResource::new().handle(method='delete')",
            run: || HttpResource::new().handle_method("delete"),
            expected: "A correct method is delete".to_string(),
        },
        Example {
            source: "HttpResource::new().handle(method='update')",
            run: || HttpResource::new().handle_method("update"),
            expected: method_rejected("update"),
        },
        Example {
            source: "HttpResource::new().handle(method='GET')",
            run: || HttpResource::new().handle_method("GET"),
            expected: method_rejected("GET"),
        },
        Example {
            source: "configure(name='db')",
            run: || -> Result<String> { demo::configure()?.call(&CallArgs::new().kwarg("name", "db")) },
            expected: "configured db with 0 option(s)".to_string(),
        },
        Example {
            source: "configure(name='db', options={'pool': 4})",
            run: || -> Result<String> {
                let options: IndexMap<String, ArgValue> =
                    [("pool".to_string(), ArgValue::Int(4))].into_iter().collect();
                demo::configure()?.call(
                    &CallArgs::new()
                        .kwarg("name", "db")
                        .kwarg("options", ArgValue::Dict(options)),
                )
            },
            expected: "configured db with 1 option(s)".to_string(),
        },
        Example {
            source: "configure(name=42)",
            run: || -> Result<String> { demo::configure()?.call(&CallArgs::new().kwarg("name", 42)) },
            expected: "type_mismatch: Argument 'name' for function configure('name', 'options') \
                       must be type [<class 'str'>], not <class 'int'>"
                .to_string(),
        },
        Example {
            source: "configure(options=None)",
            run: || -> Result<String> {
                demo::configure()?.call(&CallArgs::new().kwarg("options", ArgValue::None))
            },
            expected: "missing_argument: Argument 'name' for function configure('name', 'options') \
                       was not supplied"
                .to_string(),
        },
        Example {
            source: "validate_argument(name_argument='method', allowed_argument_values='get')",
            run: || {
                ValueValidator::configure(
                    &CallArgs::new()
                        .kwarg("name_argument", "method")
                        .kwarg("allowed_argument_values", "get"),
                )
                .map(|v| format!("{:?}", v.rule()))
            },
            expected: "type_mismatch: Argument 'allowed_argument_values' for function \
                       validate_argument('name_argument', 'allowed_argument_values') \
                       must be type [<class 'list'>], not <class 'str'>"
                .to_string(),
        },
    ]
}

/// Outcome of a single example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub source: String,
    pub expected: String,
    pub got: String,
    pub passed: bool,
}

/// Outcome of the whole example suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestReport {
    pub suite: String,
    pub cases: Vec<CaseOutcome>,
}

impl SelfTestReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Run every embedded example
pub fn run_examples() -> SelfTestReport {
    let cases = examples()
        .into_iter()
        .map(|example| {
            let got = render(&(example.run)());
            let passed = got == example.expected;
            debug!(source = example.source, passed, "example finished");
            CaseOutcome {
                source: example.source.to_string(),
                expected: example.expected,
                got,
                passed,
            }
        })
        .collect();

    SelfTestReport {
        suite: SUITE_NAME.to_string(),
        cases,
    }
}
