//! Argument Validation
//!
//! Guards that check the keyword arguments of a call before the wrapped
//! callable runs.
//!
//! ## Features
//!
//! - **Type Validation**: each annotated keyword argument must have one of its
//!   declared runtime types, or be omitted when the annotation allows absence
//! - **Allowed Values**: one keyword argument must be a member of a fixed list
//! - **Stacking**: a guarded callable can be wrapped again by another guard
//! - **Definitions**: guards can be declared in JSON, YAML or TOML files
//! - **CLI Support**: `arg-validate` runs the embedded examples and checks calls
//!
//! ## Architecture
//!
//! 1. **Values** (`value/`, `call/`): dynamic argument values, call arguments
//!    and callable signatures.
//!
//! 2. **Rules** (`rules/`): the `ArgRule` trait with the type and
//!    allowed-value rules.
//!
//! 3. **Guards** (`guard/`): `Callable`, `Guarded` and the two validators.
//!
//! 4. **Definitions** (`definition/`): file-based guard configuration.
//!
//! 5. **CLI** (`cli/`): command-line interface with table/JSON/YAML output.
//!
//! ## Example
//!
//! ```rust
//! use arg_validation::{
//!     Annotations, ArgError, ArgValue, CallArgs, Callable, Function, Signature, TypeSpec,
//!     TypeTag, TypeValidator,
//! };
//!
//! let configure = TypeValidator::new(
//!     Annotations::builder()
//!         .annotate("name", TypeTag::Str)
//!         .annotate("options", TypeSpec::any_of([TypeTag::Dict, TypeTag::None]).or_absent()),
//! )
//! .wrap(Function::new(
//!     Signature::new("configure", ["name", "options"]),
//!     |args: &CallArgs| -> arg_validation::Result<usize> { Ok(args.keyword.len()) },
//! ))
//! .unwrap();
//!
//! assert_eq!(configure.call(&CallArgs::new().kwarg("name", "db")).unwrap(), 1);
//!
//! let err = configure
//!     .call(&CallArgs::new().kwarg("name", "db").kwarg("options", ArgValue::Int(1)))
//!     .unwrap_err();
//! assert!(matches!(err, ArgError::TypeMismatch { .. }));
//! ```

pub mod call;
pub mod cli;
pub mod definition;
pub mod demo;
pub mod error;
pub mod guard;
pub mod rules;
pub mod selftest;
pub mod value;

pub use call::{CallArgs, Signature};
pub use definition::{CompiledGuard, DefinitionFormat, GuardDefinition, TypeEntry};
pub use error::{ArgError, Result};
pub use guard::{Callable, Function, Guarded, TypeValidator, ValueValidator};
pub use rules::allowed::AllowedValuesRule;
pub use rules::type_check::{Annotations, AnnotationsBuilder, TypeCheckRule, TypeSpec};
pub use rules::{ArgRule, Rejection, RuleCategory, RuleSet};
pub use selftest::{run_examples, CaseOutcome, SelfTestReport};
pub use value::{ArgValue, TypeTag};

pub use cli::{ExitCode, OutputFormat, ValidateCli, ValidateCommands};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
pub fn run_cli(cli: ValidateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    }
}
