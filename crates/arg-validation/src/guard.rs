//! Guarded callables
//!
//! A `Guarded` callable runs its rule against the call's arguments and only
//! then calls the inner callable, returning its result untouched. Guards can
//! be stacked: a guarded callable is itself a `Callable`.
//!
//! ```
//! use arg_validation::{CallArgs, Callable, Function, Signature, ValueValidator};
//!
//! let handle = Function::new(
//!     Signature::new("HttpResource.handle", ["self", "method"]),
//!     |args: &CallArgs| -> arg_validation::Result<Option<String>> {
//!         Ok(args.get("method").map(|m| m.to_plain_string()))
//!     },
//! );
//! let guarded = ValueValidator::new("method", vec!["get", "post"]).wrap(handle);
//!
//! assert!(guarded.call(&CallArgs::new().kwarg("method", "get")).is_ok());
//! assert!(guarded.call(&CallArgs::new().kwarg("method", "GET")).is_err());
//! ```

use std::fmt;

use tracing::debug;

use crate::call::{CallArgs, Signature};
use crate::error::{ArgError, Result};
use crate::rules::allowed::AllowedValuesRule;
use crate::rules::type_check::{Annotations, AnnotationsBuilder, TypeCheckRule};
use crate::rules::ArgRule;
use crate::value::{ArgValue, TypeTag};

/// Something that can be called with `CallArgs`
pub trait Callable {
    type Output;

    /// Declared signature, used in rejection messages
    fn signature(&self) -> &Signature;

    fn call(&self, args: &CallArgs) -> Result<Self::Output>;

    /// Wrap this callable so `rule` is checked before every call
    fn guarded_by<R: ArgRule>(self, rule: R) -> Guarded<R, Self>
    where
        Self: Sized,
    {
        Guarded::new(rule, self)
    }
}

/// A plain closure with a declared signature
pub struct Function<F> {
    signature: Signature,
    body: F,
}

impl<F> Function<F> {
    pub fn new(signature: Signature, body: F) -> Self {
        Self { signature, body }
    }
}

impl<F> fmt::Debug for Function<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl<F, T> Callable for Function<F>
where
    F: Fn(&CallArgs) -> Result<T>,
{
    type Output = T;

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: &CallArgs) -> Result<T> {
        (self.body)(args)
    }
}

/// A callable whose arguments are checked by `rule` before it runs
#[derive(Debug)]
pub struct Guarded<R, C> {
    rule: R,
    inner: C,
}

impl<R, C> Guarded<R, C> {
    pub fn new(rule: R, inner: C) -> Self {
        Self { rule, inner }
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<R: ArgRule, C: Callable> Callable for Guarded<R, C> {
    type Output = C::Output;

    fn signature(&self) -> &Signature {
        self.inner.signature()
    }

    fn call(&self, args: &CallArgs) -> Result<C::Output> {
        if let Err(err) = self.rule.check(self.inner.signature(), args) {
            debug!(
                rule = self.rule.id(),
                category = %self.rule.category(),
                function = self.inner.signature().qualname(),
                "guard rejected call"
            );
            return Err(err);
        }
        self.inner.call(args)
    }
}

/// Guards a callable's keyword argument types
#[derive(Debug, Clone, Default)]
pub struct TypeValidator {
    annotations: AnnotationsBuilder,
}

impl TypeValidator {
    pub fn new(annotations: AnnotationsBuilder) -> Self {
        Self { annotations }
    }

    /// Wrap `callable`; the annotations are validated against its signature here
    pub fn wrap<C: Callable>(self, callable: C) -> Result<Guarded<TypeCheckRule, C>> {
        let annotations = self.annotations.build(callable.signature())?;
        Ok(callable.guarded_by(TypeCheckRule::new(annotations)))
    }
}

/// Guards a single keyword argument against an allowed-value list
#[derive(Debug, Clone, PartialEq)]
pub struct ValueValidator {
    rule: AllowedValuesRule,
}

/// Qualified name of the dynamic value-validator factory
pub const FACTORY_NAME: &str = "validate_argument";

impl ValueValidator {
    pub fn new<I, T>(name_argument: impl Into<String>, allowed_argument_values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArgValue>,
    {
        Self {
            rule: AllowedValuesRule::new(name_argument, allowed_argument_values),
        }
    }

    /// Configure from dynamic keyword arguments
    ///
    /// The factory's own arguments are type checked first:
    /// `name_argument` must be a `str` and `allowed_argument_values` a `list`.
    pub fn configure(args: &CallArgs) -> Result<Self> {
        factory()?.call(args)
    }

    pub fn rule(&self) -> &AllowedValuesRule {
        &self.rule
    }

    pub fn wrap<C: Callable>(self, callable: C) -> Guarded<AllowedValuesRule, C> {
        callable.guarded_by(self.rule)
    }
}

fn factory() -> Result<Guarded<TypeCheckRule, impl Callable<Output = ValueValidator>>> {
    let build = Function::new(
        Signature::new(FACTORY_NAME, ["name_argument", "allowed_argument_values"]),
        |args: &CallArgs| -> Result<ValueValidator> {
            let name = args
                .get("name_argument")
                .and_then(ArgValue::as_str)
                .ok_or_else(|| ArgError::invalid_input("name_argument must be a string"))?;
            let allowed = args
                .get("allowed_argument_values")
                .and_then(ArgValue::as_list)
                .ok_or_else(|| ArgError::invalid_input("allowed_argument_values must be a list"))?;
            Ok(ValueValidator::new(name, allowed.to_vec()))
        },
    );

    TypeValidator::new(
        Annotations::builder()
            .annotate("name_argument", TypeTag::Str)
            .annotate("allowed_argument_values", TypeTag::List),
    )
    .wrap(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::type_check::TypeSpec;
    use std::cell::Cell;

    fn echo_method() -> Function<impl Fn(&CallArgs) -> Result<String>> {
        Function::new(
            Signature::new("HttpResource.handle", ["self", "method"]),
            |args: &CallArgs| -> Result<String> {
                let method = args
                    .get("method")
                    .map(ArgValue::to_plain_string)
                    .unwrap_or_default();
                Ok(format!("A correct method is {}", method))
            },
        )
    }

    #[test]
    fn test_value_validator_returns_inner_result() {
        let guarded = ValueValidator::new("method", vec!["get", "post"]).wrap(echo_method());
        let result = guarded.call(&CallArgs::new().kwarg("method", "post")).unwrap();
        assert_eq!(result, "A correct method is post");
        assert_eq!(guarded.signature().qualname(), "HttpResource.handle");
    }

    #[test]
    fn test_inner_not_called_on_rejection() {
        let calls = Cell::new(0);
        let inner = Function::new(Signature::new("f", ["n"]), |_: &CallArgs| -> Result<()> {
            calls.set(calls.get() + 1);
            Ok(())
        });
        let guarded = TypeValidator::new(Annotations::builder().annotate("n", TypeTag::Int))
            .wrap(inner)
            .unwrap();

        assert!(guarded.call(&CallArgs::new().kwarg("n", "one")).is_err());
        assert_eq!(calls.get(), 0);

        guarded.call(&CallArgs::new().kwarg("n", 1)).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_type_validator_rejects_bad_annotations() {
        let result = TypeValidator::new(Annotations::builder().annotate("nope", TypeTag::Int))
            .wrap(echo_method());
        assert!(matches!(result, Err(ArgError::InvalidDefinition(_))));
    }

    #[test]
    fn test_stacked_guards() {
        let guarded = TypeValidator::new(
            Annotations::builder().annotate("method", TypeSpec::of(TypeTag::Str)),
        )
        .wrap(ValueValidator::new("method", vec!["get"]).wrap(echo_method()))
        .unwrap();

        assert!(matches!(
            guarded.call(&CallArgs::new().kwarg("method", 7)),
            Err(ArgError::TypeMismatch { .. })
        ));
        assert!(matches!(
            guarded.call(&CallArgs::new().kwarg("method", "put")),
            Err(ArgError::ValueNotAllowed { .. })
        ));
        assert!(guarded.call(&CallArgs::new().kwarg("method", "get")).is_ok());
    }

    #[test]
    fn test_configure_from_kwargs() {
        let args = CallArgs::new()
            .kwarg("name_argument", "method")
            .kwarg("allowed_argument_values", vec!["get", "post"]);
        let validator = ValueValidator::configure(&args).unwrap();
        assert_eq!(validator, ValueValidator::new("method", vec!["get", "post"]));
    }

    #[test]
    fn test_configure_type_checks_its_arguments() {
        let args = CallArgs::new()
            .kwarg("name_argument", "method")
            .kwarg("allowed_argument_values", "get");
        let err = ValueValidator::configure(&args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument 'allowed_argument_values' for function \
             validate_argument('name_argument', 'allowed_argument_values') \
             must be type [<class 'list'>], not <class 'str'>"
        );

        let missing = CallArgs::new().kwarg("allowed_argument_values", vec!["get"]);
        assert!(matches!(
            ValueValidator::configure(&missing),
            Err(ArgError::MissingArgument { .. })
        ));
    }
}
